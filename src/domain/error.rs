//! Domain error types.

/// Why a single symbol could not be evaluated.
///
/// These never abort a scan: the dashboard reports the symbol as unavailable
/// and moves on to the next one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("rate limited while fetching {symbol}")]
    RateLimited { symbol: String },

    #[error("malformed data for {symbol}: {reason}")]
    Malformed { symbol: String, reason: String },
}

impl DataError {
    pub fn symbol(&self) -> &str {
        match self {
            DataError::NoData { symbol }
            | DataError::RateLimited { symbol }
            | DataError::Malformed { symbol, .. } => symbol,
        }
    }

    /// Short label for dashboard cells.
    pub fn label(&self) -> &'static str {
        match self {
            DataError::NoData { .. } => "no data",
            DataError::RateLimited { .. } => "rate limited",
            DataError::Malformed { .. } => "malformed",
        }
    }
}

/// Top-level error type for tickerscope.
#[derive(Debug, thiserror::Error)]
pub enum TickerscopeError {
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

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TickerscopeError {
    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TickerscopeError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit status: 1 for I/O and CSV, 2 for config, 5 for data.
    pub fn exit_status(&self) -> u8 {
        match self {
            TickerscopeError::Io(_) | TickerscopeError::Csv(_) => 1,
            TickerscopeError::ConfigParse { .. }
            | TickerscopeError::ConfigMissing { .. }
            | TickerscopeError::ConfigInvalid { .. } => 2,
            TickerscopeError::Data(_) => 5,
        }
    }
}

impl From<&TickerscopeError> for std::process::ExitCode {
    fn from(err: &TickerscopeError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
