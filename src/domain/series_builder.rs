//! Builds the aligned daily record table from raw source series.
//!
//! The price series defines the calendar: one record per distinct price date
//! in `[start, end)`. Every other input is aligned onto those dates as-of
//! (forward fill, then back fill for the leading gap) and falls back to a
//! fixed default when its source delivered nothing usable.

use crate::domain::daily_record::{DailyRecord, Observation};
use crate::domain::error::SentitraderError;
use crate::domain::indicator::fill::align_or_default;
use crate::domain::indicator::rsi::{momentum_series, DEFAULT_RSI_PERIOD};
use chrono::NaiveDate;
use log::{info, warn};

pub const DEFAULT_EPS: f64 = 6.0;
pub const DEFAULT_VOLATILITY: f64 = 20.0;
pub const DEFAULT_YIELD_SPREAD: f64 = 0.5;

/// Raw series as delivered by the data sources.
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub prices: Vec<Observation>,
    pub earnings: Vec<Observation>,
    pub volatility: Vec<Observation>,
    pub yield_spread: Vec<Observation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuilderParams {
    pub rsi_period: usize,
    pub default_eps: f64,
    pub default_volatility: f64,
    pub default_yield_spread: f64,
}

impl Default for BuilderParams {
    fn default() -> Self {
        BuilderParams {
            rsi_period: DEFAULT_RSI_PERIOD,
            default_eps: DEFAULT_EPS,
            default_volatility: DEFAULT_VOLATILITY,
            default_yield_spread: DEFAULT_YIELD_SPREAD,
        }
    }
}

pub fn build_records(
    ticker: &str,
    inputs: &RawInputs,
    start: NaiveDate,
    end: NaiveDate,
    params: &BuilderParams,
) -> Result<Vec<DailyRecord>, SentitraderError> {
    let prices = price_calendar(&inputs.prices, start, end);
    if prices.is_empty() {
        return Err(SentitraderError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: format!("no usable prices between {} and {}", start, end),
        });
    }

    let dates: Vec<NaiveDate> = prices.iter().map(|o| o.date).collect();
    let closes: Vec<f64> = prices.iter().map(|o| o.value).collect();

    let eps = align_optional(
        "earnings",
        &dates,
        &usable(&inputs.earnings, |v| v != 0.0),
        params.default_eps,
    );
    let volatility = align_optional(
        "volatility",
        &dates,
        &usable(&inputs.volatility, |_| true),
        params.default_volatility,
    );
    let yield_spread = align_optional(
        "yield spread",
        &dates,
        &usable(&inputs.yield_spread, |_| true),
        params.default_yield_spread,
    );
    let momentum = momentum_series(&closes, params.rsi_period);

    let records: Vec<DailyRecord> = (0..dates.len())
        .map(|i| DailyRecord {
            date: dates[i],
            price: closes[i],
            eps: eps[i],
            valuation_ratio: closes[i] / eps[i],
            volatility: volatility[i],
            yield_spread: yield_spread[i],
            momentum: momentum[i],
        })
        .collect();

    info!(
        "built {} daily records for {} ({} to {})",
        records.len(),
        ticker,
        dates[0],
        dates[dates.len() - 1]
    );
    Ok(records)
}

/// Percent change of consecutive prices; the first day is 0.
pub fn daily_returns(records: &[DailyRecord]) -> Vec<f64> {
    let mut returns = Vec::with_capacity(records.len());
    if records.is_empty() {
        return returns;
    }
    returns.push(0.0);
    returns.extend(records.windows(2).map(|w| w[1].price / w[0].price - 1.0));
    returns
}

/// Prices inside `[start, end)`, sorted, one per date (last wins), with
/// non-finite or non-positive values dropped.
fn price_calendar(prices: &[Observation], start: NaiveDate, end: NaiveDate) -> Vec<Observation> {
    let mut in_range: Vec<Observation> = prices
        .iter()
        .copied()
        .filter(|o| o.date >= start && o.date < end)
        .collect();

    let before = in_range.len();
    in_range.retain(|o| o.value.is_finite() && o.value > 0.0);
    if in_range.len() < before {
        warn!("dropped {} malformed price rows", before - in_range.len());
    }

    in_range.sort_by_key(|o| o.date);
    let mut calendar: Vec<Observation> = Vec::with_capacity(in_range.len());
    for obs in in_range {
        match calendar.last_mut() {
            Some(last) if last.date == obs.date => *last = obs,
            _ => calendar.push(obs),
        }
    }
    calendar
}

fn usable(observations: &[Observation], accept: impl Fn(f64) -> bool) -> Vec<Observation> {
    observations
        .iter()
        .copied()
        .filter(|o| o.value.is_finite() && accept(o.value))
        .collect()
}

fn align_optional(
    name: &str,
    dates: &[NaiveDate],
    observations: &[Observation],
    default: f64,
) -> Vec<f64> {
    if observations.is_empty() {
        warn!("{} unavailable, using default {}", name, default);
    }
    align_or_default(dates, observations, default)
}
