//! Result type definition and extension traits for log-and-continue wiring.
//!
//! Page behaviors must never take each other down: a failure while wiring
//! one behavior is logged and the caller moves on with a safe default.

use crate::error::Error;

/// The standard Result type for pagefx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait providing safe combinators for Results.
pub trait ResultExt<T> {
    /// Convert a Result to an Option, logging the error if present.
    fn into_option_logged(self) -> Option<T>;

    /// Get the value or a default, logging the error if present.
    fn or_default_logged(self, default: T) -> T;

    /// Drop the value, logging the error if present.
    fn log_err(self);
}

impl<T> ResultExt<T> for Result<T> {
    fn into_option_logged(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("operation failed: {}", e);
                None
            }
        }
    }

    fn or_default_logged(self, default: T) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("operation failed, using default: {}", e);
                default
            }
        }
    }

    fn log_err(self) {
        if let Err(e) = self {
            tracing::warn!("operation failed: {}", e);
        }
    }
}
