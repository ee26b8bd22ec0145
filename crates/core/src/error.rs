//! Core error types for page enhancement.
//!
//! Behavioral failures degrade to safe defaults and never reach this type;
//! these variants cover invalid configuration and platform calls that reject.

use thiserror::Error;

/// Core error type for pagefx operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // Configuration errors
    #[error("invalid intersection threshold {value}: must be within 0.0..=1.0")]
    InvalidThreshold { value: f64 },

    #[error("invalid duration for '{field}': must be greater than zero")]
    InvalidDuration { field: &'static str },

    #[error("invalid log level '{value}'")]
    InvalidLogLevel { value: String },

    #[error("config parse error: {reason}")]
    ConfigParse { reason: String },

    // Platform errors
    #[error("DOM operation '{operation}' failed: {reason}")]
    Dom { operation: String, reason: String },

    #[error("intersection observer failed: {reason}")]
    Observer { reason: String },
}

impl Error {
    /// Create a DOM operation error.
    pub fn dom(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Dom {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create an intersection observer error.
    pub fn observer(reason: impl Into<String>) -> Self {
        Self::Observer {
            reason: reason.into(),
        }
    }

    /// Create a config parse error.
    pub fn config_parse(reason: impl Into<String>) -> Self {
        Self::ConfigParse {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::config_parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_error_display() {
        let err = Error::dom("classList.add", "SyntaxError");
        assert_eq!(
            err.to_string(),
            "DOM operation 'classList.add' failed: SyntaxError"
        );
    }

    #[test]
    fn test_threshold_error_display() {
        let err = Error::InvalidThreshold { value: 1.5 };
        assert!(err.to_string().contains("0.0..=1.0"));
    }

    #[test]
    fn test_json_error_converts_to_config_parse() {
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let converted = parsed.map_err(Error::from);
        assert!(matches!(converted, Err(Error::ConfigParse { .. })));
    }
}
