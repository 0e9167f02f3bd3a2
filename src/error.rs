//! Error types for the quiz session core

use thiserror::Error;

/// Main error type for the quiz session core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Question needs at least 2 options, got {0}")]
    TooFewOptions(usize),

    #[error("Option slot mismatch: {expected} slots configured, question has {actual} options")]
    StructuralMismatch { expected: usize, actual: usize },

    #[error("Option index out of range: {index} (must be between 1 and {max})")]
    OutOfRange { index: i64, max: usize },

    #[error("Selection locked until the next question is drawn")]
    SelectionLocked,

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl QuizError {
    pub(crate) fn not_initialized() -> Self {
        QuizError::Configuration("Questions are not set".to_string())
    }
}

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        QuizError::Deserialization(err.to_string())
    }
}

impl From<std::io::Error> for QuizError {
    fn from(err: std::io::Error) -> Self {
        QuizError::Io(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<QuizError> for pyo3::PyErr {
    fn from(err: QuizError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyIndexError, PyOSError, PyRuntimeError, PyValueError};

        let msg = err.to_string();
        match err {
            QuizError::Configuration(_) | QuizError::SelectionLocked => {
                PyRuntimeError::new_err(msg)
            }
            QuizError::TooFewOptions(_)
            | QuizError::StructuralMismatch { .. }
            | QuizError::Deserialization(_) => {
                PyValueError::new_err(msg)
            }
            QuizError::OutOfRange { .. } => PyIndexError::new_err(msg),
            QuizError::Io(_) => PyOSError::new_err(msg),
        }
    }
}

/// Result type alias for the quiz session core
pub type Result<T> = std::result::Result<T, QuizError>;
