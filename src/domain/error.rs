//! Domain error types.

/// Top-level error type for vixbooster.
#[derive(Debug, thiserror::Error)]
pub enum VixboosterError {
    #[error("insufficient history for {series}: have {bars} observations, need {minimum}")]
    InsufficientHistory {
        series: String,
        bars: usize,
        minimum: usize,
    },

    #[error("missing indicator {name}: {reason}")]
    MissingIndicator { name: String, reason: String },

    #[error("invalid configuration {key}: {reason}")]
    InvalidConfiguration { key: String, reason: String },

    #[error("invalid price for {asset}: {price}")]
    InvalidPrice { asset: String, price: f64 },

    #[error("invalid series {series}: {reason}")]
    InvalidSeries { series: String, reason: String },

    #[error("invalid holdings: {reason}")]
    InvalidHoldings { reason: String },

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

    #[error("market data error: {reason}")]
    DataSource { reason: String },

    #[error("holdings store error: {reason}")]
    HoldingsStore { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VixboosterError {
    pub(crate) fn invalid_configuration(key: &str, reason: impl Into<String>) -> Self {
        VixboosterError::InvalidConfiguration {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            VixboosterError::Io(_) => 1,
            VixboosterError::ConfigParse { .. }
            | VixboosterError::ConfigMissing { .. }
            | VixboosterError::ConfigInvalid { .. }
            | VixboosterError::InvalidConfiguration { .. } => 2,
            VixboosterError::DataSource { .. } | VixboosterError::HoldingsStore { .. } => 3,
            VixboosterError::InsufficientHistory { .. }
            | VixboosterError::MissingIndicator { .. }
            | VixboosterError::InvalidSeries { .. } => 5,
            VixboosterError::InvalidPrice { .. } | VixboosterError::InvalidHoldings { .. } => 6,
        }
    }
}

impl From<&VixboosterError> for std::process::ExitCode {
    fn from(err: &VixboosterError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
