//! Error types for deformation and augmentation operations.

use std::fmt;

/// Result type for deformation operations.
pub type DeformResult<T> = Result<T, DeformError>;

/// Errors that can occur while building or applying deformations.
#[derive(Debug, Clone)]
pub enum DeformError {
    /// The batch of volumes is unusable as configured.
    Config { message: String },

    /// A volume or field deviates from the expected shape.
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        context: String,
    },

    /// Source and target volumes disagree on element type.
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
        context: String,
    },

    /// A 64-bit label volume holds values too large to resample safely.
    LabelRangeOverflow { max: u64, context: String },

    /// Invalid parameter value.
    InvalidParameter { parameter: String, message: String },

    /// Error from underlying numr operation.
    NumrError(String),
}

impl fmt::Display for DeformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::ShapeMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Shape mismatch in {}: expected {:?}, got {:?}",
                    context, expected, actual
                )
            }
            Self::KindMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Element type mismatch in {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            Self::LabelRangeOverflow { max, context } => {
                write!(
                    f,
                    "Label value {} exceeds the safe 32-bit range in {}; \
                     u64 label volumes must stay below u32::MAX to be resampled",
                    max, context
                )
            }
            Self::InvalidParameter { parameter, message } => {
                write!(f, "Invalid parameter '{}': {}", parameter, message)
            }
            Self::NumrError(msg) => {
                write!(f, "numr error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DeformError {}

impl From<numr::error::Error> for DeformError {
    fn from(err: numr::error::Error) -> Self {
        Self::NumrError(err.to_string())
    }
}
