//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Please enter your API key.")]
    MissingCredential,

    #[error("Session has not been initialized with a system prompt")]
    SessionNotInitialized,

    #[error("Invalid sampling parameter {name}: {value} (allowed range {min}..={max})")]
    InvalidSampling {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_display() {
        let error = DomainError::MissingCredential;
        assert_eq!(error.to_string(), "Please enter your API key.");
    }

    #[test]
    fn test_invalid_sampling_display() {
        let error = DomainError::InvalidSampling {
            name: "temperature",
            value: 1.5,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(
            error.to_string(),
            "Invalid sampling parameter temperature: 1.5 (allowed range 0..=1)"
        );
    }
}
