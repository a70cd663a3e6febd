//! Domain error types.

/// Top-level error type for stockmetrics.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("stock not found: {symbol}")]
    NotFound { symbol: String },

    #[error("stock already exists: {symbol}")]
    AlreadyExists { symbol: String },

    #[error("stock with symbol {symbol} does not exist in the market")]
    UnknownStock { symbol: String },

    #[error("price must be greater than 0, got {price}")]
    InvalidPrice { price: f64 },

    #[error("quantity must be greater than 0, got {quantity}")]
    InvalidQuantity { quantity: u64 },

    #[error("invalid stock {symbol}: {reason}")]
    InvalidStock { symbol: String, reason: String },

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

    #[error("data file error in {file}: {reason}")]
    DataFile { file: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MarketError> for std::process::ExitCode {
    fn from(err: &MarketError) -> Self {
        let code: u8 = match err {
            MarketError::Io(_) => 1,
            MarketError::ConfigParse { .. }
            | MarketError::ConfigMissing { .. }
            | MarketError::ConfigInvalid { .. } => 2,
            MarketError::DataFile { .. } => 3,
            MarketError::NotFound { .. }
            | MarketError::AlreadyExists { .. }
            | MarketError::UnknownStock { .. } => 4,
            MarketError::InvalidPrice { .. }
            | MarketError::InvalidQuantity { .. }
            | MarketError::InvalidStock { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
