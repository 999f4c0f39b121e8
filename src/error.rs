//! Error types for LDA estimation and querying.
//!
//! Every validation failure is raised before a chain iteration runs, so a
//! returned error never leaves a model with partially updated state.

use std::fmt;

/// Main error type for LDA operations.
///
/// # Examples
///
/// ```
/// use aprender_lda::error::LdaError;
///
/// let err = LdaError::VocabularyMismatch {
///     expected: 120,
///     actual: 118,
/// };
/// assert!(err.to_string().contains("vocabulary mismatch"));
/// ```
#[derive(Debug)]
pub enum LdaError {
    /// Argument has the wrong shape, type or range.
    InvalidArgument {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Matrix dimensions don't agree with each other.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Topic-term matrix and vocabulary disagree on the number of terms.
    VocabularyMismatch {
        /// Terms in the topic-term matrix
        expected: usize,
        /// Entries in the supplied vocabulary
        actual: usize,
    },

    /// Posterior results requested before any sample was drawn.
    NotSampled,

    /// I/O error while exporting or importing a model.
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),
}

impl fmt::Display for LdaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LdaError::InvalidArgument {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid argument: {param} = {value}, expected {constraint}"
                )
            }
            LdaError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Matrix dimension mismatch: expected {expected}, got {actual}"
                )
            }
            LdaError::VocabularyMismatch { expected, actual } => {
                write!(
                    f,
                    "Topic-term vocabulary mismatch: matrix has {expected} terms, vocabulary has {actual}"
                )
            }
            LdaError::NotSampled => {
                write!(f, "Model not sampled. Call sample() first")
            }
            LdaError::Io(e) => write!(f, "I/O error: {e}"),
            LdaError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for LdaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LdaError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LdaError {
    fn from(err: std::io::Error) -> Self {
        LdaError::Io(err)
    }
}

impl LdaError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(param: &str, value: impl fmt::Display, constraint: &str) -> Self {
        Self::InvalidArgument {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }

    /// Create an index out of bounds error
    #[must_use]
    pub fn index_out_of_bounds(param: &str, index: usize, len: usize) -> Self {
        Self::InvalidArgument {
            param: param.to_string(),
            value: index.to_string(),
            constraint: format!("index < {len}"),
        }
    }

    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, LdaError>;
