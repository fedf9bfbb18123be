//! Performance metrics over daily return series.
//!
//! Every reduction here is a pure function of its inputs. Degenerate inputs
//! (empty series, zero volatility) produce 0 rather than an error.

use crate::domain::signal::Signal;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Last day's classifier inputs of interest and its signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestReading {
    pub signal: Signal,
    pub valuation_ratio: f64,
    pub momentum: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    /// Buy-and-hold return over the same days.
    pub market_return: f64,
    pub annualized_return: f64,
    /// Annualized sample standard deviation of strategy returns.
    pub volatility: f64,
    pub risk_adjusted_ratio: f64,
    /// Worst peak-to-trough decline as a non-positive fraction.
    pub max_drawdown: f64,
    pub trade_count: usize,
    pub latest: Option<LatestReading>,
}

impl Metrics {
    pub fn compute(
        strategy_returns: &[f64],
        market_returns: &[f64],
        trade_count: usize,
        latest: Option<LatestReading>,
    ) -> Self {
        let strategy_growth = cumulative_growth(strategy_returns);
        let market_growth = cumulative_growth(market_returns);

        let strategy_total = total_return(&strategy_growth);
        let annualized = annualized_return(strategy_total, strategy_returns.len());
        let volatility = annualized_volatility(strategy_returns);
        let risk_adjusted_ratio = if volatility > 0.0 {
            annualized / volatility
        } else {
            0.0
        };

        Metrics {
            total_return: strategy_total,
            market_return: total_return(&market_growth),
            annualized_return: annualized,
            volatility,
            risk_adjusted_ratio,
            max_drawdown: max_drawdown(&strategy_growth),
            trade_count,
            latest,
        }
    }
}

/// Running product of (1 + r).
pub fn cumulative_growth(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0_f64, |growth, r| {
            *growth *= 1.0 + r;
            Some(*growth)
        })
        .collect()
}

/// Final growth factor minus one; 0 for an empty curve.
pub fn total_return(growth: &[f64]) -> f64 {
    growth.last().map(|g| g - 1.0).unwrap_or(0.0)
}

/// (1 + total)^(252 / days) - 1; 0 when there are no days.
pub fn annualized_return(total_return: f64, days: usize) -> f64 {
    if days == 0 {
        return 0.0;
    }
    (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / days as f64) - 1.0
}

/// Sample standard deviation (n - 1) of daily returns times sqrt(252).
/// Fewer than two observations have no spread and yield 0.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Minimum of growth / running_max(growth) - 1 over the curve.
pub fn max_drawdown(growth: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &g in growth {
        peak = peak.max(g);
        if peak > 0.0 {
            worst = worst.min(g / peak - 1.0);
        }
    }
    worst
}
