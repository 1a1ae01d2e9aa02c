//! Error types for the tessera-rs library.
//!
//! Configuration problems fail fast at engine construction; per-pair input
//! problems surface as validation errors that the batch driver records
//! without aborting the remaining comparisons.

use thiserror::Error;

/// Main result type for tessera operations.
pub type Result<T> = std::result::Result<T, TesseraError>;

/// Comprehensive error type for all tessera operations.
#[derive(Error, Debug)]
pub enum TesseraError {
    /// Configuration errors; reported once, at engine construction
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Validation errors for runtime input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
        /// Expected value or format
        expected: Option<String>,
        /// Actual value received
        actual: Option<String>,
    },

    /// Malformed comparison input (mismatched or inconsistent submissions)
    #[error("Input shape error: {message}")]
    InputShape {
        /// Error description
        message: String,
        /// Submission identifier involved, if known
        submission: Option<String>,
    },

    /// External signal provider failures surfaced through the batch driver
    #[error("Signal provider error for pair ({a}, {b}): {message}")]
    SignalProvider {
        /// First submission in the pair
        a: String,
        /// Second submission in the pair
        b: String,
        /// Error description
        message: String,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
        /// Additional context
        context: Option<String>,
    },
}

impl TesseraError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
            expected: None,
            actual: None,
        }
    }

    /// Create a new validation error with expected/actual context
    pub fn validation_with_values(
        message: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
            expected: Some(expected.into()),
            actual: Some(actual.into()),
        }
    }

    /// Create a new input shape error
    pub fn input_shape(message: impl Into<String>) -> Self {
        Self::InputShape {
            message: message.into(),
            submission: None,
        }
    }

    /// Create a new signal provider error for a pair
    pub fn signal_provider(
        a: impl Into<String>,
        b: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SignalProvider {
            a: a.into(),
            b: b.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: None,
        }
    }

    /// True when the error indicates a construction-time configuration problem.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
