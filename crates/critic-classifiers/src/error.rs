use std::error::Error;
use std::fmt;

/// Errors raised while training, scoring or evaluating a classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// A label in the label set has no training instances.
    InsufficientData { label: usize },
    /// A feature index (or model shape) disagrees with the declared dimensions.
    DimensionMismatch { expected: usize, found: usize },
    /// Nothing to evaluate or train on.
    EmptyInput(String),
    /// Malformed external input (CSV rows, model blobs).
    ParseError { line: usize, message: String },
    /// A label outside `0..num_labels`.
    LabelOutOfRange { label: usize, num_labels: usize },
    /// A hyper-parameter outside its valid range.
    InvalidParameter { name: String, value: String },
    /// A feature weight that is negative or not finite.
    InvalidValue(String),
    /// Every fold of a cross-validation run was skipped.
    NoUsableFolds { k: usize },
    /// Model used before it was trained.
    NotFitted,
    Io(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifierError::InsufficientData { label } => {
                write!(f, "Label {} has no training instances", label)
            }
            ClassifierError::DimensionMismatch { expected, found } => write!(
                f,
                "Dimension mismatch: expected at most {} features, found {}",
                expected, found
            ),
            ClassifierError::EmptyInput(context) => write!(f, "Empty input: {}", context),
            ClassifierError::ParseError { line, message } => {
                write!(f, "Parse error at line {}: {}", line, message)
            }
            ClassifierError::LabelOutOfRange { label, num_labels } => write!(
                f,
                "Label {} is outside the label range 0..{}",
                label, num_labels
            ),
            ClassifierError::InvalidParameter { name, value } => {
                write!(f, "Invalid value for '{}': {}", name, value)
            }
            ClassifierError::InvalidValue(message) => write!(f, "Invalid value: {}", message),
            ClassifierError::NoUsableFolds { k } => {
                write!(f, "None of the {} cross-validation folds could be evaluated", k)
            }
            ClassifierError::NotFitted => write!(f, "Model has not been trained"),
            ClassifierError::Io(message) => write!(f, "I/O error: {}", message),
        }
    }
}

impl Error for ClassifierError {}

impl From<std::io::Error> for ClassifierError {
    fn from(err: std::io::Error) -> Self {
        ClassifierError::Io(err.to_string())
    }
}

impl From<csv::Error> for ClassifierError {
    fn from(err: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io_err) = err.kind() {
            return ClassifierError::Io(io_err.to_string());
        }
        let line = err
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or_default();
        ClassifierError::ParseError {
            line,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClassifierError {
    fn from(err: serde_json::Error) -> Self {
        ClassifierError::ParseError {
            line: err.line(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
