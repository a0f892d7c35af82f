//! Domain error types.

use crate::domain::symbol::SelectionError;

/// Top-level error type for stockboard.
#[derive(Debug, thiserror::Error)]
pub enum StockboardError {
    #[error("ticker directory unavailable ({source_name}): {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error("price fetch failed for {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    #[error("invalid date range: {reason}")]
    InvalidDateRange { reason: String },

    #[error(transparent)]
    Selection(#[from] SelectionError),

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

impl StockboardError {
    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        StockboardError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&StockboardError> for std::process::ExitCode {
    fn from(err: &StockboardError) -> Self {
        let code: u8 = match err {
            StockboardError::Io(_) => 1,
            StockboardError::ConfigParse { .. }
            | StockboardError::ConfigMissing { .. }
            | StockboardError::ConfigInvalid { .. } => 2,
            StockboardError::SourceUnavailable { .. } | StockboardError::Fetch { .. } => 3,
            StockboardError::Selection(_) | StockboardError::InvalidDateRange { .. } => 4,
            StockboardError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
