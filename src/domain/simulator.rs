//! Position simulation: signals and market returns in, strategy returns out.
//!
//! A long-only, single-position state machine. Day `i` acts on the signal
//! produced on day `i - 1`, so day 0 never carries a position and its
//! strategy return is always 0.
//!
//! | State | Signal     | Next  | Realized return        | Trade |
//! |-------|------------|-------|------------------------|-------|
//! | Flat  | Buy        | Long  | r - cost               | yes   |
//! | Flat  | Sell, Hold | Flat  | 0                      | no    |
//! | Long  | Sell       | Flat  | r - cost               | yes   |
//! | Long  | Buy, Hold  | Long  | r                      | no    |
//! | Long  | Buy, Hold  | Flat  | r - cost if r < stop   | yes   |
//!
//! The stop-loss fires on the day's raw return regardless of whether the
//! acting signal was Buy or Hold.

use crate::domain::signal::Signal;
use log::debug;

pub const DEFAULT_TRANSACTION_COST: f64 = 0.001;
pub const DEFAULT_STOP_LOSS: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Fraction deducted from the day's return on every entry or exit.
    pub transaction_cost: f64,
    /// Daily return strictly below which an open position is closed.
    pub stop_loss: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            transaction_cost: DEFAULT_TRANSACTION_COST,
            stop_loss: DEFAULT_STOP_LOSS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Entry,
    Exit,
    StopLoss,
}

impl TradeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeKind::Entry => "ENTRY",
            TradeKind::Exit => "EXIT",
            TradeKind::StopLoss => "STOP_LOSS",
        }
    }
}

/// A position transition on a given day index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeEvent {
    pub day: usize,
    pub kind: TradeKind,
}

/// Outcome of a single simulated day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub next: PositionState,
    pub realized: f64,
    pub trade: Option<TradeKind>,
}

/// Apply one day's acting signal and market return to the current state.
pub fn step(
    state: PositionState,
    signal: Signal,
    market_return: f64,
    config: &SimulationConfig,
) -> Step {
    let cost = config.transaction_cost;
    match (state, signal) {
        (PositionState::Flat, Signal::Buy) => Step {
            next: PositionState::Long,
            realized: market_return - cost,
            trade: Some(TradeKind::Entry),
        },
        (PositionState::Flat, Signal::Sell | Signal::Hold) => Step {
            next: PositionState::Flat,
            realized: 0.0,
            trade: None,
        },
        (PositionState::Long, Signal::Sell) => Step {
            next: PositionState::Flat,
            realized: market_return - cost,
            trade: Some(TradeKind::Exit),
        },
        (PositionState::Long, Signal::Buy | Signal::Hold) if market_return < config.stop_loss => {
            Step {
                next: PositionState::Flat,
                realized: market_return - cost,
                trade: Some(TradeKind::StopLoss),
            }
        }
        (PositionState::Long, Signal::Buy | Signal::Hold) => Step {
            next: PositionState::Long,
            realized: market_return,
            trade: None,
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    /// One entry per market-return day; entry 0 is always 0.
    pub strategy_returns: Vec<f64>,
    pub trades: Vec<TradeEvent>,
    pub final_state: PositionState,
}

impl Simulation {
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }
}

/// Run the state machine over the whole series.
///
/// `signals[i]` is the signal produced on day `i`; `market_returns[i]` is the
/// raw return realised on day `i`. The output is as long as `market_returns`;
/// days without a prior-day signal act as Hold.
pub fn simulate(
    signals: &[Signal],
    market_returns: &[f64],
    config: &SimulationConfig,
) -> Simulation {
    debug_assert_eq!(signals.len(), market_returns.len());

    let mut trades = Vec::new();
    let mut strategy_returns = Vec::with_capacity(market_returns.len());
    if market_returns.is_empty() {
        return Simulation {
            strategy_returns,
            trades,
            final_state: PositionState::Flat,
        };
    }
    strategy_returns.push(0.0);

    let final_state = market_returns
        .iter()
        .enumerate()
        .skip(1)
        .fold(PositionState::Flat, |state, (day, &market_return)| {
            let acting = signals.get(day - 1).copied().unwrap_or(Signal::Hold);
            let outcome = step(state, acting, market_return, config);
            if let Some(kind) = outcome.trade {
                if kind == TradeKind::StopLoss {
                    debug!("stop-loss on day {} (return {:.4})", day, market_return);
                }
                trades.push(TradeEvent { day, kind });
            }
            strategy_returns.push(outcome.realized);
            outcome.next
        });

    Simulation {
        strategy_returns,
        trades,
        final_state,
    }
}
