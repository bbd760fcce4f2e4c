//! Error types for the pivot engine.

use thiserror::Error;

/// Errors that abort a pivot run.
#[derive(Debug, Error)]
pub enum PivotError {
    /// A numeric answer has no entry in its question's value domain.
    #[error("value '{code}' of variable '{variable}' has no label in the value label map")]
    MissingValueMapping { variable: String, code: String },

    /// A question column vanished between classification and pivoting.
    #[error("column '{column}' not found in the survey table")]
    ColumnNotFound { column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for PivotError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for pivot operations.
pub type Result<T> = std::result::Result<T, PivotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mapping_names_variable_and_code() {
        let err = PivotError::MissingValueMapping {
            variable: "Q4".to_string(),
            code: "7".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "value '7' of variable 'Q4' has no label in the value label map"
        );
    }
}
