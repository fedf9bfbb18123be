//! As-of alignment of sparse observations onto a daily calendar.
//!
//! Each calendar day takes the latest observation dated on or before it
//! (forward fill). Days before the first observation take the first
//! observation (back fill).

use crate::domain::daily_record::Observation;
use chrono::NaiveDate;

/// Align `observations` onto `dates`, which must be ascending.
///
/// Returns `None` when there is nothing to align, leaving the choice of
/// default to the caller.
pub fn align_as_of(dates: &[NaiveDate], observations: &[Observation]) -> Option<Vec<f64>> {
    if observations.is_empty() {
        return None;
    }

    let mut sorted = observations.to_vec();
    // stable: among same-date observations the last one supplied wins
    sorted.sort_by_key(|o| o.date);
    let first = sorted[0].value;

    let mut cursor = 0;
    let mut current: Option<f64> = None;
    let aligned = dates
        .iter()
        .map(|date| {
            while cursor < sorted.len() && sorted[cursor].date <= *date {
                current = Some(sorted[cursor].value);
                cursor += 1;
            }
            current.unwrap_or(first)
        })
        .collect();

    Some(aligned)
}

/// [`align_as_of`], or `default` on every day when there are no observations.
pub fn align_or_default(
    dates: &[NaiveDate],
    observations: &[Observation],
    default: f64,
) -> Vec<f64> {
    align_as_of(dates, observations).unwrap_or_else(|| vec![default; dates.len()])
}
