//! Configuration validation.
//!
//! Runs before any data is fetched. Keys that may still be supplied on the
//! command line (ticker, dates) are only checked when present.

use crate::domain::error::SentitraderError;
use crate::domain::indicator::rsi::DEFAULT_RSI_PERIOD;
use crate::domain::series_builder::DEFAULT_EPS;
use crate::domain::signal::ScoringRules;
use crate::domain::simulator::{DEFAULT_STOP_LOSS, DEFAULT_TRANSACTION_COST};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SentitraderError> {
    validate_dates(config)?;
    validate_transaction_cost(config)?;
    validate_stop_loss(config)?;
    validate_indicator_config(config)?;
    validate_signal_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SentitraderError> {
    match config.get_non_empty("data", "dir") {
        Some(_) => Ok(()),
        None => Err(SentitraderError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        }),
    }
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), SentitraderError> {
    let period = config.get_int("indicators", "rsi_period", DEFAULT_RSI_PERIOD as i64);
    if period < 1 {
        return Err(invalid("indicators", "rsi_period", "rsi_period must be at least 1"));
    }
    let eps = config.get_double("indicators", "default_eps", DEFAULT_EPS);
    if eps == 0.0 || !eps.is_finite() {
        return Err(invalid("indicators", "default_eps", "default_eps must be a non-zero number"));
    }
    Ok(())
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), SentitraderError> {
    let defaults = ScoringRules::default();
    let pairs = [
        (
            "valuation_buy_below",
            defaults.valuation_buy_below,
            "valuation_sell_above",
            defaults.valuation_sell_above,
        ),
        (
            "volatility_buy_below",
            defaults.volatility_buy_below,
            "volatility_sell_above",
            defaults.volatility_sell_above,
        ),
        (
            "momentum_buy_below",
            defaults.momentum_buy_below,
            "momentum_sell_above",
            defaults.momentum_sell_above,
        ),
    ];

    let yield_buy = config.get_double(
        "signal",
        "yield_spread_buy_above",
        defaults.yield_spread_buy_above,
    );
    if !yield_buy.is_finite() {
        return Err(not_finite("yield_spread_buy_above"));
    }

    for (buy_key, buy_default, sell_key, sell_default) in pairs {
        let buy = config.get_double("signal", buy_key, buy_default);
        let sell = config.get_double("signal", sell_key, sell_default);
        if !buy.is_finite() {
            return Err(not_finite(buy_key));
        }
        if !sell.is_finite() {
            return Err(not_finite(sell_key));
        }
        if buy > sell {
            return Err(invalid(
                "signal",
                buy_key,
                &format!("{} must not exceed {}", buy_key, sell_key),
            ));
        }
    }

    let buy_score = config.get_int("signal", "buy_score", i64::from(defaults.buy_score));
    let sell_score = config.get_int("signal", "sell_score", i64::from(defaults.sell_score));
    for (key, value) in [("buy_score", buy_score), ("sell_score", sell_score)] {
        if i32::try_from(value).is_err() {
            return Err(invalid("signal", key, &format!("{} is out of range", key)));
        }
    }
    if buy_score <= sell_score {
        return Err(invalid("signal", "buy_score", "buy_score must be greater than sell_score"));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SentitraderError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid("backtest", "start_date", "start_date must be before end_date"));
        }
    }
    Ok(())
}

fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, SentitraderError> {
    match config.get_date("backtest", key) {
        None => Ok(None),
        Some(Ok(date)) => Ok(Some(date)),
        Some(Err(_)) => Err(invalid(
            "backtest",
            key,
            &format!("invalid {} format, expected YYYY-MM-DD", key),
        )),
    }
}

fn validate_transaction_cost(config: &dyn ConfigPort) -> Result<(), SentitraderError> {
    let value = config.get_double("backtest", "transaction_cost", DEFAULT_TRANSACTION_COST);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "backtest",
            "transaction_cost",
            "transaction_cost must be in [0, 1)",
        ));
    }
    Ok(())
}

fn validate_stop_loss(config: &dyn ConfigPort) -> Result<(), SentitraderError> {
    let value = config.get_double("backtest", "stop_loss", DEFAULT_STOP_LOSS);
    if value <= -1.0 || value > 0.0 || value.is_nan() {
        return Err(invalid(
            "backtest",
            "stop_loss",
            "stop_loss must be a daily return in (-1, 0]",
        ));
    }
    Ok(())
}

fn not_finite(key: &str) -> SentitraderError {
    invalid("signal", key, &format!("{} must be a finite number", key))
}

fn invalid(section: &str, key: &str, reason: &str) -> SentitraderError {
    SentitraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
