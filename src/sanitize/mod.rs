//! Sanitization utilities for outbound email content.
//!
//! These are defense-in-depth, client-side filters applied before content is
//! transmitted; they reduce injection risk but are not a substitute for the
//! server-side sanitization the Metigan API performs.
//!
//! All functions here are pure and exported standalone for callers who want
//! to use them outside the bundled client.

mod address;
mod html;

pub use address::{extract_address, is_valid_email, sanitize_email, sanitize_subject};
pub use html::sanitize_html;
