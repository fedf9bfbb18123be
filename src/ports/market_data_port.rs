//! Market data acquisition port.
//!
//! Only `fetch_prices` is mandatory for a run. The remaining fetches may fail
//! or come back empty; the caller degrades them to documented defaults.

use crate::domain::daily_record::Observation;
use crate::domain::error::SentitraderError;
use chrono::NaiveDate;

pub trait MarketDataPort {
    /// Daily closing prices in `[start, end)`.
    fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError>;

    /// Earnings-per-share observations, possibly sparse or dated before `start`.
    fn fetch_earnings(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError>;

    /// Volatility index levels.
    fn fetch_volatility(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError>;

    /// Long minus short yield-curve spread.
    fn fetch_yield_spread(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError>;
}
