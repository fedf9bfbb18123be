//! Indicator calculations over an aligned daily calendar.
//!
//! - [`rsi`]: momentum oscillator from closing prices
//! - [`fill`]: as-of alignment of sparse observations onto the calendar

pub mod fill;
pub mod rsi;
