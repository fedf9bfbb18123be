//! RSI (Relative Strength Index) momentum oscillator.
//!
//! Uses simple rolling means over the last `period` price changes:
//! - avg_gain = mean of positive changes (negatives count as 0)
//! - avg_loss = mean of |negative changes| (positives count as 0)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! Warmup: the first `period` days have no value (day `period` is the first
//! with `period` changes behind it). A window with no losses is undefined.

/// Neutral midpoint substituted wherever RSI is undefined.
pub const NEUTRAL_MOMENTUM: f64 = 50.0;

pub const DEFAULT_RSI_PERIOD: usize = 14;

pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; prices.len()];
    if period == 0 || prices.len() <= period {
        return values;
    }

    // changes[j] is the move from day j to day j + 1
    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    for (i, value) in values.iter_mut().enumerate().skip(period) {
        let window = &changes[i - period..i];
        let avg_gain = window.iter().filter(|&&c| c > 0.0).sum::<f64>() / period as f64;
        let avg_loss = window.iter().filter(|&&c| c < 0.0).map(|c| -c).sum::<f64>() / period as f64;
        *value = rsi_from_averages(avg_gain, avg_loss);
    }

    values
}

/// RSI with undefined days replaced by [`NEUTRAL_MOMENTUM`].
pub fn momentum_series(prices: &[f64], period: usize) -> Vec<f64> {
    calculate_rsi(prices, period)
        .into_iter()
        .map(|v| v.unwrap_or(NEUTRAL_MOMENTUM))
        .collect()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss > 0.0 {
        Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
    } else {
        None
    }
}
