//! Daily observation and aligned daily record types.

use chrono::NaiveDate;

/// One dated raw value as delivered by a data source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// One trading day with every indicator input defined.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub price: f64,
    pub eps: f64,
    pub valuation_ratio: f64,
    pub volatility: f64,
    pub yield_spread: f64,
    /// RSI in [0, 100].
    pub momentum: f64,
}

/// The four scalars the classifier looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub valuation_ratio: f64,
    pub volatility: f64,
    pub yield_spread: f64,
    pub momentum: f64,
}

impl DailyRecord {
    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            valuation_ratio: self.valuation_ratio,
            volatility: self.volatility,
            yield_spread: self.yield_spread,
            momentum: self.momentum,
        }
    }
}
