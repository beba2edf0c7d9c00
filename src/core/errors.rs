//! Error types for the recognition engine.
//!
//! A single error enum covers the whole pipeline: model initialization,
//! invalid inputs, per-system processing failures and step cancellation.
//! Helper constructors keep call sites short.

use thiserror::Error;

/// Convenient result alias for engine operations.
pub type OmrResult<T> = Result<T, OmrError>;

/// Errors raised by the recognition engine.
#[derive(Error, Debug)]
pub enum OmrError {
    /// The trained shape model could not be initialized.
    ///
    /// Raised on first use of the classifier; there is no silent fallback
    /// to a default model.
    #[error("model initialization: {message}")]
    ModelInit {
        /// What went wrong while building the model.
        message: String,
    },

    /// Error indicating invalid input data.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error raised by a processing step body.
    #[error("processing failed: {context}")]
    Processing {
        /// Additional context about the failure.
        context: String,
    },

    /// The step run was cancelled while waiting on its system tasks.
    ///
    /// Distinct from a processing failure: completed work is kept, pending
    /// work is abandoned, and the whole step invocation aborts.
    #[error("step cancelled")]
    Cancelled,

    /// Error while parsing training descriptors.
    #[error("descriptor parsing")]
    Descriptor(#[from] serde_json::Error),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl OmrError {
    /// Creates an error for a failed model initialization.
    pub fn model_init(message: impl Into<String>) -> Self {
        Self::ModelInit {
            message: message.into(),
        }
    }

    /// Creates an error for invalid input data.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for a configuration problem.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an error for a failed processing step body.
    pub fn processing(context: impl Into<String>) -> Self {
        Self::Processing {
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OmrError::model_init("empty descriptor set");
        assert_eq!(err.to_string(), "model initialization: empty descriptor set");

        let err = OmrError::Cancelled;
        assert_eq!(err.to_string(), "step cancelled");
    }

    #[test]
    fn test_descriptor_error_from_serde() {
        let parse: Result<Vec<i32>, _> = serde_json::from_str("not json");
        let err: OmrError = parse.unwrap_err().into();
        assert!(matches!(err, OmrError::Descriptor(_)));
    }
}
