//! Additive scoring classifier mapping one day's indicators to a signal.
//!
//! Each factor contributes at most one point in either direction:
//!
//! | Condition                        | Score |
//! |----------------------------------|-------|
//! | valuation_ratio < 30             | +1    |
//! | valuation_ratio > 40             | -1    |
//! | volatility < 18                  | +1    |
//! | volatility > 30                  | -1    |
//! | yield_spread > 0.3               | +1    |
//! | momentum < 30                    | +1    |
//! | momentum > 70                    | -1    |
//!
//! score >= 2 is BUY, score <= -2 is SELL, anything else is HOLD. All
//! comparisons are strict, so a value sitting on a threshold scores nothing.

use crate::domain::daily_record::IndicatorSnapshot;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Signal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Thresholds of the scoring rule. `Default` is the standard rule set.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRules {
    pub valuation_buy_below: f64,
    pub valuation_sell_above: f64,
    pub volatility_buy_below: f64,
    pub volatility_sell_above: f64,
    pub yield_spread_buy_above: f64,
    pub momentum_buy_below: f64,
    pub momentum_sell_above: f64,
    pub buy_score: i32,
    pub sell_score: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        ScoringRules {
            valuation_buy_below: 30.0,
            valuation_sell_above: 40.0,
            volatility_buy_below: 18.0,
            volatility_sell_above: 30.0,
            yield_spread_buy_above: 0.3,
            momentum_buy_below: 30.0,
            momentum_sell_above: 70.0,
            buy_score: 2,
            sell_score: -2,
        }
    }
}

impl ScoringRules {
    /// Sum of the per-factor contributions.
    pub fn score(&self, snapshot: &IndicatorSnapshot) -> i32 {
        let mut score = 0;

        if snapshot.valuation_ratio < self.valuation_buy_below {
            score += 1;
        } else if snapshot.valuation_ratio > self.valuation_sell_above {
            score -= 1;
        }

        if snapshot.volatility < self.volatility_buy_below {
            score += 1;
        } else if snapshot.volatility > self.volatility_sell_above {
            score -= 1;
        }

        if snapshot.yield_spread > self.yield_spread_buy_above {
            score += 1;
        }

        if snapshot.momentum < self.momentum_buy_below {
            score += 1;
        } else if snapshot.momentum > self.momentum_sell_above {
            score -= 1;
        }

        score
    }

    pub fn decide(&self, score: i32) -> Signal {
        if score >= self.buy_score {
            Signal::Buy
        } else if score <= self.sell_score {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    pub fn classify(&self, snapshot: &IndicatorSnapshot) -> Signal {
        self.decide(self.score(snapshot))
    }
}

/// Classify with the default rule set.
pub fn classify(valuation_ratio: f64, volatility: f64, yield_spread: f64, momentum: f64) -> Signal {
    ScoringRules::default().classify(&IndicatorSnapshot {
        valuation_ratio,
        volatility,
        yield_spread,
        momentum,
    })
}
