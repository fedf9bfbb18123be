#![allow(dead_code)]

use chrono::NaiveDate;
use sentitrader::domain::daily_record::{DailyRecord, Observation};
use sentitrader::domain::error::SentitraderError;
use sentitrader::ports::market_data_port::MarketDataPort;
use std::collections::HashSet;

/// In-memory market data with per-source error injection.
#[derive(Default)]
pub struct MockMarketDataPort {
    pub prices: Vec<Observation>,
    pub earnings: Vec<Observation>,
    pub volatility: Vec<Observation>,
    pub yield_spread: Vec<Observation>,
    pub failing: HashSet<&'static str>,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prices(mut self, prices: Vec<Observation>) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_earnings(mut self, earnings: Vec<Observation>) -> Self {
        self.earnings = earnings;
        self
    }

    pub fn with_volatility(mut self, volatility: Vec<Observation>) -> Self {
        self.volatility = volatility;
        self
    }

    pub fn with_yield_spread(mut self, yield_spread: Vec<Observation>) -> Self {
        self.yield_spread = yield_spread;
        self
    }

    /// `source` is one of "prices", "earnings", "volatility", "yield_spread".
    pub fn with_error(mut self, source: &'static str) -> Self {
        self.failing.insert(source);
        self
    }

    fn serve(
        &self,
        source: &'static str,
        data: &[Observation],
    ) -> Result<Vec<Observation>, SentitraderError> {
        if self.failing.contains(source) {
            return Err(SentitraderError::DataSource {
                reason: format!("{} feed offline", source),
            });
        }
        Ok(data.to_vec())
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn fetch_prices(
        &self,
        _ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError> {
        let prices = self.serve("prices", &self.prices)?;
        Ok(prices
            .into_iter()
            .filter(|o| o.date >= start && o.date < end)
            .collect())
    }

    fn fetch_earnings(
        &self,
        _ticker: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError> {
        self.serve("earnings", &self.earnings)
    }

    fn fetch_volatility(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError> {
        self.serve("volatility", &self.volatility)
    }

    fn fetch_yield_spread(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError> {
        self.serve("yield_spread", &self.yield_spread)
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days starting at `start`.
pub fn dates_from(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect()
}

pub fn series(start: NaiveDate, values: &[f64]) -> Vec<Observation> {
    dates_from(start, values.len())
        .into_iter()
        .zip(values)
        .map(|(d, &v)| Observation::new(d, v))
        .collect()
}

pub fn constant_series(start: NaiveDate, count: usize, value: f64) -> Vec<Observation> {
    series(start, &vec![value; count])
}

/// Prices rising linearly from 100 to 120 over 20 days.
pub fn rising_prices(start: NaiveDate) -> Vec<Observation> {
    let values: Vec<f64> = (0..20).map(|i| 100.0 + 20.0 * i as f64 / 19.0).collect();
    series(start, &values)
}

pub fn make_record(date: NaiveDate, price: f64) -> DailyRecord {
    DailyRecord {
        date,
        price,
        eps: 4.0,
        valuation_ratio: price / 4.0,
        volatility: 20.0,
        yield_spread: 0.0,
        momentum: 50.0,
    }
}
