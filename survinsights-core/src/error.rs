//! Error types for the survinsights-core crate.

use thiserror::Error;

/// Top-level error type for explanation computations.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// An enumerated parameter (output type, loss, scoring type, metric) was
    /// outside the supported set.
    #[error("Unsupported {option}: {value:?}")]
    UnsupportedOption { option: &'static str, value: String },

    /// The requested capability exists as an entry point only.
    #[error("Unsupported capability: {0}")]
    UnsupportedCapability(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ExplainError {
    pub fn unsupported_option(option: &'static str, value: impl Into<String>) -> Self {
        Self::UnsupportedOption {
            option,
            value: value.into(),
        }
    }

    pub fn unsupported_capability(msg: impl Into<String>) -> Self {
        Self::UnsupportedCapability(msg.into())
    }

    pub fn feature_not_found(name: impl Into<String>) -> Self {
        Self::FeatureNotFound(name.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExplainError>;
