//! Configuration access port.
//!
//! Getters with a default never fail: a missing or unparseable value yields
//! the default. Validation of ranges happens in `domain::config_validation`.

use chrono::NaiveDate;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// Non-blank string value, trimmed.
    fn get_non_empty(&self, section: &str, key: &str) -> Option<String> {
        self.get_string(section, key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// `YYYY-MM-DD` date. `None` when absent or blank, `Some(Err(raw))` when
    /// present but unparseable.
    fn get_date(&self, section: &str, key: &str) -> Option<Result<NaiveDate, String>> {
        self.get_non_empty(section, key)
            .map(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| raw))
    }
}
