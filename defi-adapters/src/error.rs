use thiserror::Error;

use crate::write_actions::WriteAction;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not implemented: {protocol}/{product} does not support {action}")]
    NotImplemented {
        protocol: String,
        product: String,
        action: WriteAction,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AdapterError {
    fn from(e: serde_json::Error) -> Self {
        AdapterError::SerializationError(e.to_string())
    }
}

impl From<alloy::contract::Error> for AdapterError {
    fn from(e: alloy::contract::Error) -> Self {
        AdapterError::ProviderError(e.to_string())
    }
}
