//! Error types for client construction.
//!
//! This module contains the errors returned while validating construction
//! options: credentials, the store URL, and the rate limit knobs.
//!
//! # Error Handling
//!
//! All validating constructors return `Result<T, ConfigError>` so that a
//! misconfigured client fails at construction time rather than on its first
//! request.
//!
//! # Example
//!
//! ```rust
//! use shopifapi::{ConfigError, Credentials};
//!
//! let result = Credentials::new("", "secret");
//! assert!(matches!(result, Err(ConfigError::EmptyUsername)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring a client.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Username cannot be empty.
    #[error("Username cannot be empty. Please provide the private app API key.")]
    EmptyUsername,

    /// Password cannot be empty.
    #[error("Password cannot be empty. Please provide the private app password.")]
    EmptyPassword,

    /// Store URL is invalid.
    #[error("Invalid store URL '{url}'. Expected format: 'https://shop-name.myshopify.com'.")]
    InvalidStoreUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A rate limit knob is out of range.
    #[error("Invalid rate limit: {reason}")]
    InvalidRateLimit {
        /// The reason the limit was rejected.
        reason: String,
    },
}
