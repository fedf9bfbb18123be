//! Core domain types and logic.

pub mod daily_record;
pub mod indicator;
pub mod series_builder;
pub mod signal;
pub mod simulator;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
