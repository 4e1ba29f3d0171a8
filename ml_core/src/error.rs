use std::fmt;

use linfa_linear::LinearError;

/// Errors produced by the encoder and the models when inputs are invalid.
#[derive(Debug)]
pub enum MlError {
    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),

    /// A shape invariant was violated (e.g. mismatched lengths).
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "targets", "features").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },

    /// A class index has no label in the encoder.
    UnknownLabel {
        /// The index that was asked for.
        index: i64,
        /// Number of classes known to the encoder.
        classes: usize,
    },

    /// A label string was not seen when the encoder was fit.
    UnseenLabel(String),

    /// The least-squares fit failed inside `linfa-linear`.
    Linear(LinearError<f64>),

    /// The logistic solver could not run to completion.
    Solver(String),
}

impl fmt::Display for MlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            MlError::ShapeMismatch { what, got, expected } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            MlError::UnknownLabel { index, classes } => {
                write!(f, "unknown label: index {index} is outside [0, {classes})")
            }
            MlError::UnseenLabel(label) => write!(f, "label '{label}' was not seen during fit"),
            MlError::Linear(e) => write!(f, "least-squares fit failed: {e}"),
            MlError::Solver(msg) => write!(f, "logistic solver failed: {msg}"),
        }
    }
}

impl std::error::Error for MlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MlError::Linear(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LinearError<f64>> for MlError {
    fn from(e: LinearError<f64>) -> Self {
        MlError::Linear(e)
    }
}

impl From<argmin::core::Error> for MlError {
    fn from(e: argmin::core::Error) -> Self {
        MlError::Solver(e.to_string())
    }
}
