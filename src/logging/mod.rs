//! Diagnostic and telemetry logging.
//!
//! Two concerns live here. [`DebugLogger`] is a cheap, injectable switch
//! over the `tracing` macros for verbose request diagnostics. The
//! [`usage`] module batches anonymous usage records and ships them to the
//! API in the background.

pub mod usage;

pub use usage::{UsageLogger, UsageRecord};

use tracing::{debug, error, warn};

/// Verbose diagnostic logger.
///
/// Each client owns its own instance, so enabling debug output on one
/// client never affects another. All output goes through `tracing` under
/// the `metigan` target.
#[derive(Debug, Clone)]
pub struct DebugLogger {
    enabled: bool,
}

impl DebugLogger {
    /// Create a logger. When `enabled` is false every call is a no-op.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Whether diagnostic output is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Log a diagnostic message.
    pub fn log(&self, message: &str) {
        if self.enabled {
            debug!(target: "metigan", "{}", message);
        }
    }

    /// Log a warning.
    pub fn warn(&self, message: &str) {
        if self.enabled {
            warn!(target: "metigan", "{}", message);
        }
    }

    /// Log an error.
    pub fn error(&self, message: &str) {
        if self.enabled {
            error!(target: "metigan", "{}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_logger_is_silent() {
        let logger = DebugLogger::new(false);
        assert!(!logger.enabled());
        // No panic, no output.
        logger.log("nothing");
        logger.warn("nothing");
        logger.error("nothing");
    }

    #[test]
    fn enabled_logger_reports_enabled() {
        assert!(DebugLogger::new(true).enabled());
    }
}
