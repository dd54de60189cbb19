//! Domain error types.
//!
//! Pure computations (indicators, signals, learned filter, risk, reward) never
//! fail; only loading, configuration and the CLI surface produce these.

/// Top-level error type for scalptrader.
#[derive(Debug, thiserror::Error)]
pub enum ScalperError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("price data error in {source_name}: {reason}")]
    Data { source_name: String, reason: String },

    #[error("no usable price bars in {source_name}")]
    EmptyTable { source_name: String },

    #[error("trade log error in {source_name}: {reason}")]
    TradeLog { source_name: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScalperError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        ScalperError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&ScalperError> for std::process::ExitCode {
    fn from(err: &ScalperError) -> Self {
        let code: u8 = match err {
            ScalperError::Io(_) => 1,
            ScalperError::ConfigParse { .. } | ScalperError::ConfigInvalid { .. } => 2,
            ScalperError::Data { .. } | ScalperError::EmptyTable { .. } => 3,
            ScalperError::TradeLog { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
