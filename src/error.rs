//! Error types for sizectl
//!
//! This module defines the error handling strategy for sizectl. There are two
//! error types: `SizectlError` (main error enum) and `ConfigError`
//! (configuration-specific).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `SizectlError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling. The
//! conversion happens at the CLI boundary using `anyhow::Error::from` to
//! preserve error chains.
//!
//! ## When to Use Which Error
//!
//! - `CatalogUnavailable`: the instance catalog endpoint failed or returned
//!   an undecodable body. Aborts the sizing run; no internal retry.
//!
//! - `PricingUnavailable`: the spot price endpoint failed or returned an
//!   undecodable body. Aborts the sizing run; no internal retry.
//!
//! - `Validation`: input validation failures (requirement fields, CLI
//!   arguments). Not an external-dependency failure.
//!
//! - `ConfigError`: configuration parsing and validation issues, converted to
//!   `SizectlError::Config` via `#[from]`.
//!
//! A sizing run that finds no viable instance type is NOT an error; it
//! completes with an empty `SizingResult`.

use thiserror::Error;

/// Main error type for sizectl
#[derive(Error, Debug)]
pub enum SizectlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Instance catalog unavailable: {message}")]
    CatalogUnavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Spot pricing unavailable: {message}")]
    PricingUnavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SizectlError {
    /// Wrap a transport/decode failure from the catalog endpoint.
    pub fn catalog(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SizectlError::CatalogUnavailable {
            message: message.into(),
            source,
        }
    }

    /// Wrap a transport/decode failure from the pricing endpoint.
    pub fn pricing(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SizectlError::PricingUnavailable {
            message: message.into(),
            source,
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SizectlError>;
