//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvDataAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestReport};
use crate::domain::config_validation::{
    validate_backtest_config, validate_data_config, validate_signal_config,
};
use crate::domain::daily_record::IndicatorSnapshot;
use crate::domain::error::SentitraderError;
use crate::domain::indicator::rsi::DEFAULT_RSI_PERIOD;
use crate::domain::series_builder::{
    BuilderParams, DEFAULT_EPS, DEFAULT_VOLATILITY, DEFAULT_YIELD_SPREAD,
};
use crate::domain::signal::ScoringRules;
use crate::domain::simulator::{SimulationConfig, DEFAULT_STOP_LOSS, DEFAULT_TRANSACTION_COST};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "sentitrader", about = "Sentiment indicator backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest and export the daily table as CSV
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Exclusive last day, YYYY-MM-DD (default today)
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Classify a single set of indicator readings
    Classify {
        #[arg(long, allow_hyphen_values = true)]
        valuation: f64,
        #[arg(long)]
        volatility: f64,
        #[arg(long, allow_hyphen_values = true)]
        yield_spread: f64,
        #[arg(long, allow_hyphen_values = true)]
        momentum: f64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the `[backtest]` section.
#[derive(Debug, Clone, Default)]
pub struct BacktestOverrides {
    pub ticker: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            ticker,
            start,
            end,
            output,
        } => run_backtest(
            &config,
            &BacktestOverrides { ticker, start, end },
            output.as_deref(),
        ),
        Command::Classify {
            valuation,
            volatility,
            yield_spread,
            momentum,
            config,
        } => run_classify(
            IndicatorSnapshot {
                valuation_ratio: valuation,
                volatility,
                yield_spread,
                momentum,
            },
            config.as_deref(),
        ),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SentitraderError> {
    info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

fn run_backtest(
    config_path: &Path,
    overrides: &BacktestOverrides,
    output_path: Option<&Path>,
) -> Result<(), SentitraderError> {
    let adapter = load_config(config_path)?;
    validate_backtest_config(&adapter)?;
    validate_data_config(&adapter)?;

    let bt_config = build_backtest_config(&adapter, overrides)?;
    let data_dir = adapter
        .get_non_empty("data", "dir")
        .ok_or_else(|| SentitraderError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })?;
    let data_port = CsvDataAdapter::new(PathBuf::from(data_dir));

    let report = backtest_engine::run_backtest(&data_port, &bt_config)?;
    println!("{}", format_summary(&report));

    let output = resolve_output_path(output_path, &adapter, &bt_config.ticker);
    CsvReportAdapter::new().write(&report, &output)?;
    println!("\nDaily table written to: {}", output.display());
    Ok(())
}

fn run_classify(
    snapshot: IndicatorSnapshot,
    config_path: Option<&Path>,
) -> Result<(), SentitraderError> {
    let rules = match config_path {
        Some(path) => {
            let adapter = load_config(path)?;
            validate_signal_config(&adapter)?;
            build_scoring_rules(&adapter)?
        }
        None => ScoringRules::default(),
    };

    let score = rules.score(&snapshot);
    println!("Score:  {}", score);
    println!("Signal: {}", rules.decide(score));
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), SentitraderError> {
    let adapter = load_config(config_path)?;
    validate_config(&adapter)?;
    println!("Configuration is valid.");
    Ok(())
}

/// Everything `backtest` checks before fetching data, without command-line overrides.
pub fn validate_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, SentitraderError> {
    validate_backtest_config(adapter)?;
    validate_data_config(adapter)?;
    build_backtest_config(adapter, &BacktestOverrides::default())
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    overrides: &BacktestOverrides,
) -> Result<BacktestConfig, SentitraderError> {
    let ticker = overrides
        .ticker
        .clone()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| adapter.get_non_empty("backtest", "ticker"))
        .ok_or_else(|| SentitraderError::ConfigMissing {
            section: "backtest".into(),
            key: "ticker".into(),
        })?;

    let start_date = match overrides.start {
        Some(date) => date,
        None => config_date(adapter, "start_date")?.ok_or_else(|| {
            SentitraderError::ConfigMissing {
                section: "backtest".into(),
                key: "start_date".into(),
            }
        })?,
    };
    let end_date = match overrides.end {
        Some(date) => Some(date),
        None => config_date(adapter, "end_date")?,
    };

    if let Some(end) = end_date {
        if start_date >= end {
            return Err(SentitraderError::ConfigInvalid {
                section: "backtest".into(),
                key: "start_date".into(),
                reason: format!("start {} is not before end {}", start_date, end),
            });
        }
    }

    Ok(BacktestConfig {
        ticker: ticker.to_uppercase(),
        start_date,
        end_date,
        simulation: build_simulation_config(adapter),
        builder: build_builder_params(adapter)?,
        rules: build_scoring_rules(adapter)?,
    })
}

pub fn build_simulation_config(adapter: &dyn ConfigPort) -> SimulationConfig {
    SimulationConfig {
        transaction_cost: adapter.get_double(
            "backtest",
            "transaction_cost",
            DEFAULT_TRANSACTION_COST,
        ),
        stop_loss: adapter.get_double("backtest", "stop_loss", DEFAULT_STOP_LOSS),
    }
}

pub fn build_builder_params(adapter: &dyn ConfigPort) -> Result<BuilderParams, SentitraderError> {
    let period = adapter.get_int("indicators", "rsi_period", DEFAULT_RSI_PERIOD as i64);
    let rsi_period = usize::try_from(period)
        .ok()
        .filter(|p| *p >= 1)
        .ok_or_else(|| SentitraderError::ConfigInvalid {
            section: "indicators".into(),
            key: "rsi_period".into(),
            reason: format!("{} is not a positive period", period),
        })?;

    Ok(BuilderParams {
        rsi_period,
        default_eps: adapter.get_double("indicators", "default_eps", DEFAULT_EPS),
        default_volatility: adapter.get_double(
            "indicators",
            "default_volatility",
            DEFAULT_VOLATILITY,
        ),
        default_yield_spread: adapter.get_double(
            "indicators",
            "default_yield_spread",
            DEFAULT_YIELD_SPREAD,
        ),
    })
}

pub fn build_scoring_rules(adapter: &dyn ConfigPort) -> Result<ScoringRules, SentitraderError> {
    let d = ScoringRules::default();
    let get = |key: &str, default: f64| adapter.get_double("signal", key, default);
    Ok(ScoringRules {
        valuation_buy_below: get("valuation_buy_below", d.valuation_buy_below),
        valuation_sell_above: get("valuation_sell_above", d.valuation_sell_above),
        volatility_buy_below: get("volatility_buy_below", d.volatility_buy_below),
        volatility_sell_above: get("volatility_sell_above", d.volatility_sell_above),
        yield_spread_buy_above: get("yield_spread_buy_above", d.yield_spread_buy_above),
        momentum_buy_below: get("momentum_buy_below", d.momentum_buy_below),
        momentum_sell_above: get("momentum_sell_above", d.momentum_sell_above),
        buy_score: score_threshold(adapter, "buy_score", d.buy_score)?,
        sell_score: score_threshold(adapter, "sell_score", d.sell_score)?,
    })
}

fn score_threshold(
    adapter: &dyn ConfigPort,
    key: &str,
    default: i32,
) -> Result<i32, SentitraderError> {
    let value = adapter.get_int("signal", key, i64::from(default));
    i32::try_from(value).map_err(|_| SentitraderError::ConfigInvalid {
        section: "signal".into(),
        key: key.into(),
        reason: format!("{} is out of range", value),
    })
}

/// `--output`, then `[report] output`, then `<TICKER>_backtest.csv`.
pub fn resolve_output_path(
    output_override: Option<&Path>,
    adapter: &dyn ConfigPort,
    ticker: &str,
) -> PathBuf {
    output_override
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_non_empty("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(format!("{}_backtest.csv", ticker)))
}

pub fn format_summary(report: &BacktestReport) -> String {
    let m = &report.metrics;
    let mut lines = vec![
        format!(
            "=== {} ({} to {}, {} days) ===",
            report.ticker,
            report.start_date,
            report.end_date,
            report.rows.len()
        ),
        format!("Strategy Return:  {:.2}%", m.total_return * 100.0),
        format!("Buy & Hold:       {:.2}%", m.market_return * 100.0),
        format!("Annualized:       {:.2}%", m.annualized_return * 100.0),
        format!("Volatility:       {:.2}%", m.volatility * 100.0),
        format!("Return/Vol Ratio: {:.2}", m.risk_adjusted_ratio),
        format!("Max Drawdown:     {:.1}%", m.max_drawdown * 100.0),
        format!("Trades:           {}", m.trade_count),
    ];
    if let Some(latest) = &m.latest {
        lines.push(format!("Latest Signal:    {}", latest.signal));
        lines.push(format!("Latest Valuation: {:.1}", latest.valuation_ratio));
        lines.push(format!("Latest Momentum:  {:.1}", latest.momentum));
    }
    if !report.trades.is_empty() {
        lines.push(String::new());
        lines.push("=== Trades ===".to_string());
        for trade in &report.trades {
            lines.push(format!(
                "  {}  {:<9} @ {:.2}",
                trade.date,
                trade.kind.as_str(),
                trade.price
            ));
        }
    }
    lines.join("\n")
}

fn config_date(adapter: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, SentitraderError> {
    match adapter.get_date("backtest", key) {
        None => Ok(None),
        Some(Ok(date)) => Ok(Some(date)),
        Some(Err(raw)) => Err(SentitraderError::ConfigInvalid {
            section: "backtest".into(),
            key: key.into(),
            reason: format!("'{}' is not a YYYY-MM-DD date", raw),
        }),
    }
}
