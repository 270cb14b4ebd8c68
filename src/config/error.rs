//! Configuration error types for the Metigan client.

use thiserror::Error;

/// Errors that can occur while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration field is missing or empty.
    #[error("Missing required configuration: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// Invalid configuration value or combination.
    #[error("Invalid configuration: {message}")]
    Invalid {
        /// Description of the configuration issue.
        message: String,
    },
}

impl From<ConfigError> for crate::error::MetiganError {
    fn from(err: ConfigError) -> Self {
        match err {
            // A missing or empty required field is caller input, so it
            // surfaces as a validation error naming the field.
            ConfigError::MissingField { field } => crate::error::MetiganError::Validation {
                message: format!("Missing required configuration: {}", field),
                field: Some(field),
            },
            ConfigError::Invalid { message } => crate::error::MetiganError::Configuration {
                message: format!("Invalid configuration: {}", message),
            },
        }
    }
}
