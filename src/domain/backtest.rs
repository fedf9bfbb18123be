//! Backtest pipeline: acquisition, record building, classification,
//! position simulation and evaluation, run strictly in that order.

use crate::domain::daily_record::{DailyRecord, Observation};
use crate::domain::error::SentitraderError;
use crate::domain::metrics::{cumulative_growth, LatestReading, Metrics};
use crate::domain::series_builder::{build_records, daily_returns, BuilderParams, RawInputs};
use crate::domain::signal::{ScoringRules, Signal};
use crate::domain::simulator::{simulate, SimulationConfig, TradeKind};
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub ticker: String,
    pub start_date: NaiveDate,
    /// Exclusive; `None` runs up to today.
    pub end_date: Option<NaiveDate>,
    pub simulation: SimulationConfig,
    pub builder: BuilderParams,
    pub rules: ScoringRules,
}

impl BacktestConfig {
    pub fn new(ticker: impl Into<String>, start_date: NaiveDate) -> Self {
        BacktestConfig {
            ticker: ticker.into(),
            start_date,
            end_date: None,
            simulation: SimulationConfig::default(),
            builder: BuilderParams::default(),
            rules: ScoringRules::default(),
        }
    }
}

/// One line of the per-day result table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestRow {
    pub date: NaiveDate,
    pub price: f64,
    pub eps: f64,
    pub valuation_ratio: f64,
    pub volatility: f64,
    pub yield_spread: f64,
    pub momentum: f64,
    pub signal: Signal,
    pub daily_return: f64,
    pub strategy_return: f64,
    pub cumulative_strategy: f64,
    pub cumulative_market: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutedTrade {
    pub date: NaiveDate,
    pub price: f64,
    pub kind: TradeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    pub ticker: String,
    pub start_date: NaiveDate,
    /// Last day covered by `rows`.
    pub end_date: NaiveDate,
    pub rows: Vec<BacktestRow>,
    pub trades: Vec<ExecutedTrade>,
    pub metrics: Metrics,
}

pub fn resolve_end_date(end_date: Option<NaiveDate>) -> NaiveDate {
    end_date.unwrap_or_else(|| chrono::Local::now().date_naive())
}

/// Fetch all inputs through `port` and run the full pipeline.
///
/// Fails only when the price series cannot be obtained.
pub fn run_backtest(
    port: &dyn MarketDataPort,
    config: &BacktestConfig,
) -> Result<BacktestReport, SentitraderError> {
    let start = config.start_date;
    let end = resolve_end_date(config.end_date);
    info!("fetching {} from {} to {}", config.ticker, start, end);

    let prices = port
        .fetch_prices(&config.ticker, start, end)
        .map_err(|e| match e {
            SentitraderError::DataUnavailable { .. } => e,
            other => SentitraderError::DataUnavailable {
                ticker: config.ticker.clone(),
                reason: other.to_string(),
            },
        })?;

    let inputs = RawInputs {
        prices,
        earnings: optional_input("earnings", port.fetch_earnings(&config.ticker, start, end)),
        volatility: optional_input("volatility", port.fetch_volatility(start, end)),
        yield_spread: optional_input("yield spread", port.fetch_yield_spread(start, end)),
    };

    let records = build_records(&config.ticker, &inputs, start, end, &config.builder)?;
    Ok(evaluate(records, config))
}

/// Classify, simulate and evaluate an already aligned record table.
pub fn evaluate(records: Vec<DailyRecord>, config: &BacktestConfig) -> BacktestReport {
    let signals: Vec<Signal> = records
        .iter()
        .map(|r| config.rules.classify(&r.snapshot()))
        .collect();
    let market_returns = daily_returns(&records);
    let simulation = simulate(&signals, &market_returns, &config.simulation);

    let cumulative_strategy = cumulative_growth(&simulation.strategy_returns);
    let cumulative_market = cumulative_growth(&market_returns);

    let latest = records
        .last()
        .zip(signals.last())
        .map(|(record, &signal)| LatestReading {
            signal,
            valuation_ratio: record.valuation_ratio,
            momentum: record.momentum,
        });
    let metrics = Metrics::compute(
        &simulation.strategy_returns,
        &market_returns,
        simulation.trade_count(),
        latest,
    );
    info!(
        "{}: {} trades over {} days",
        config.ticker,
        metrics.trade_count,
        records.len()
    );

    let trades = simulation
        .trades
        .iter()
        .map(|t| ExecutedTrade {
            date: records[t.day].date,
            price: records[t.day].price,
            kind: t.kind,
        })
        .collect();

    let end_date = records
        .last()
        .map(|r| r.date)
        .unwrap_or(config.start_date);

    let rows = records
        .into_iter()
        .enumerate()
        .map(|(i, r)| BacktestRow {
            date: r.date,
            price: r.price,
            eps: r.eps,
            valuation_ratio: r.valuation_ratio,
            volatility: r.volatility,
            yield_spread: r.yield_spread,
            momentum: r.momentum,
            signal: signals[i],
            daily_return: market_returns[i],
            strategy_return: simulation.strategy_returns[i],
            cumulative_strategy: cumulative_strategy[i],
            cumulative_market: cumulative_market[i],
        })
        .collect();

    BacktestReport {
        ticker: config.ticker.clone(),
        start_date: config.start_date,
        end_date,
        rows,
        trades,
        metrics,
    }
}

fn optional_input(
    name: &str,
    fetched: Result<Vec<Observation>, SentitraderError>,
) -> Vec<Observation> {
    fetched.unwrap_or_else(|e| {
        warn!("{} fetch failed ({}), degrading to default", name, e);
        Vec::new()
    })
}
