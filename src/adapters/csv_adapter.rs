//! CSV file market data adapter.
//!
//! Layout under `base_path`, every file with a `date,value` header:
//! - `<TICKER>_price.csv` (required)
//! - `<TICKER>_earnings.csv`
//! - `volatility.csv`
//! - `yield_spread.csv`

use crate::domain::daily_record::Observation;
use crate::domain::error::SentitraderError;
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    value: String,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn ticker_path(&self, ticker: &str, series: &str) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", ticker.to_uppercase(), series))
    }

    fn shared_path(&self, series: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", series))
    }

    /// Optional series: a missing file is an empty series, unparseable rows
    /// are skipped.
    fn read_optional(
        &self,
        path: &Path,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError> {
        if !path.exists() {
            debug!("{} not found", path.display());
            return Ok(Vec::new());
        }

        let mut observations = Vec::new();
        let mut skipped = 0usize;
        for row in read_rows(path)? {
            match parse_row(&row) {
                Ok(obs) if obs.date < end => observations.push(obs),
                Ok(_) => {}
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!("skipped {} unparseable rows in {}", skipped, path.display());
        }
        Ok(observations)
    }
}

impl MarketDataPort for CsvDataAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError> {
        let path = self.ticker_path(ticker, "price");
        let mut prices = Vec::new();

        for row in read_rows(&path)? {
            let obs = parse_row(&row).map_err(|reason| SentitraderError::DataSource {
                reason: format!("{}: {}", path.display(), reason),
            })?;
            if obs.date >= start && obs.date < end {
                prices.push(obs);
            }
        }

        prices.sort_by_key(|o| o.date);
        Ok(prices)
    }

    fn fetch_earnings(
        &self,
        ticker: &str,
        _start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError> {
        self.read_optional(&self.ticker_path(ticker, "earnings"), end)
    }

    fn fetch_volatility(
        &self,
        _start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError> {
        self.read_optional(&self.shared_path("volatility"), end)
    }

    fn fetch_yield_spread(
        &self,
        _start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, SentitraderError> {
        self.read_optional(&self.shared_path("yield_spread"), end)
    }
}

fn read_rows(path: &Path) -> Result<Vec<CsvRow>, SentitraderError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| SentitraderError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

    rdr.deserialize()
        .collect::<Result<Vec<CsvRow>, _>>()
        .map_err(|e| SentitraderError::DataSource {
            reason: format!("CSV parse error in {}: {}", path.display(), e),
        })
}

fn parse_row(row: &CsvRow) -> Result<Observation, String> {
    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {}", row.date, e))?;
    let value: f64 = row
        .value
        .parse()
        .map_err(|e| format!("invalid value '{}' on {}: {}", row.value, row.date, e))?;
    Ok(Observation::new(date, value))
}
