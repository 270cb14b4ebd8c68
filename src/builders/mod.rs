//! Builders for constructing Metigan requests.
//!
//! # Examples
//!
//! ```rust
//! use metigan::builders::EmailBuilder;
//!
//! let request = EmailBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Hello World")
//!     .text("This is a plain text email")
//!     .html("<p>This is an HTML email</p>")
//!     .build()?;
//! # Ok::<(), metigan::builders::BuilderError>(())
//! ```

mod email_builder;

pub use email_builder::EmailBuilder;

use thiserror::Error;

/// Errors produced while assembling a request with a builder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// A required field was never set.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field was set to an unusable value.
    #[error("Invalid field {field}: {message}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// What went wrong.
        message: String,
    },
}

impl From<BuilderError> for crate::error::MetiganError {
    fn from(err: BuilderError) -> Self {
        match err {
            BuilderError::MissingField(field) => {
                crate::error::MetiganError::validation_field("Missing required field", field)
            }
            BuilderError::InvalidField { field, message } => {
                crate::error::MetiganError::validation_field(message, field)
            }
        }
    }
}
