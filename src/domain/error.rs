//! Domain error types.
//!
//! Only the mandatory price series can abort a run. Optional inputs that are
//! missing or malformed and degenerate metrics are absorbed where they occur
//! and never surface as an error.

/// Top-level error type for sentitrader.
#[derive(Debug, thiserror::Error)]
pub enum SentitraderError {
    #[error("price data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SentitraderError {
    /// Process exit status: 1 for I/O and export, 2 for configuration, 5 for data.
    pub fn exit_code(&self) -> u8 {
        match self {
            SentitraderError::Io(_) | SentitraderError::Report { .. } => 1,
            SentitraderError::ConfigParse { .. }
            | SentitraderError::ConfigMissing { .. }
            | SentitraderError::ConfigInvalid { .. } => 2,
            SentitraderError::DataUnavailable { .. } | SentitraderError::DataSource { .. } => 5,
        }
    }
}

impl From<&SentitraderError> for std::process::ExitCode {
    fn from(err: &SentitraderError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_unavailable_message_names_ticker() {
        let err = SentitraderError::DataUnavailable {
            ticker: "AAPL".into(),
            reason: "no rows".into(),
        };
        assert_eq!(err.to_string(), "price data unavailable for AAPL: no rows");
    }

    #[test]
    fn config_invalid_message() {
        let err = SentitraderError::ConfigInvalid {
            section: "backtest".into(),
            key: "stop_loss".into(),
            reason: "must be negative".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [backtest] stop_loss: must be negative"
        );
    }

    #[test]
    fn exit_codes_by_category() {
        let io = SentitraderError::Io(std::io::Error::other("boom"));
        let report = SentitraderError::Report {
            reason: "disk full".into(),
        };
        let cfg = SentitraderError::ConfigMissing {
            section: "backtest".into(),
            key: "ticker".into(),
        };
        let data = SentitraderError::DataUnavailable {
            ticker: "X".into(),
            reason: "gone".into(),
        };
        assert_eq!(io.exit_code(), 1);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(cfg.exit_code(), 2);
        assert_eq!(data.exit_code(), 5);
    }
}
