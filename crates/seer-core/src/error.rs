//! Unified error types for the verification harness

use thiserror::Error;

/// Unified error type for all verification operations
#[derive(Error, Debug)]
pub enum SeerError {
    // Browser/session errors
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    // Scenario wait errors
    #[error("Readiness timeout: {control} still showing loading placeholder after {timeout_secs}s")]
    ReadinessTimeout { control: String, timeout_secs: u64 },

    #[error("Completion timeout: '{indicator}' still visible after {timeout_secs}s")]
    CompletionTimeout { indicator: String, timeout_secs: u64 },

    // Assertion errors
    #[error("Assertion failed: expected {expected}, observed {observed}")]
    Assertion { expected: String, observed: String },

    // Artifact errors
    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("Fixture error: {0}")]
    Fixture(String),

    // Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using SeerError
pub type Result<T> = std::result::Result<T, SeerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_messages_name_the_target() {
        let err = SeerError::ReadinessTimeout {
            control: "model selector".to_string(),
            timeout_secs: 30,
        };
        let msg = err.to_string();
        assert!(msg.contains("model selector"));
        assert!(msg.contains("30s"));

        let err = SeerError::CompletionTimeout {
            indicator: "Analyzing image details...".to_string(),
            timeout_secs: 90,
        };
        let msg = err.to_string();
        assert!(msg.contains("Analyzing image details..."));
        assert!(msg.contains("90s"));
    }

    #[test]
    fn test_assertion_carries_expected_and_observed() {
        let err = SeerError::Assertion {
            expected: r"footer matching Total Tokens: (\d+)".to_string(),
            observed: "Total Tokens: -".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains(r"Total Tokens: (\d+)"));
        assert!(msg.contains("Total Tokens: -"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SeerError = io.into();
        assert!(matches!(err, SeerError::Io(_)));
    }
}
