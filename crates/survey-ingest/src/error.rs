//! Error types for survey data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading survey tables and metadata.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Encoding label not recognised.
    #[error("unsupported encoding '{encoding}'")]
    UnsupportedEncoding { encoding: String },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Table has no header or no data rows.
    #[error("table is empty: {path}")]
    EmptyTable { path: PathBuf },

    /// A header cell is blank.
    #[error("table {path} has an empty column name")]
    EmptyColumnName { path: PathBuf },

    // === Workbook Errors ===
    /// Spreadsheet could not be opened.
    #[error("failed to open workbook {path}: {message}")]
    WorkbookOpen { path: PathBuf, message: String },

    /// Requested sheet index does not exist.
    #[error("workbook {path} has no sheet at index {index} ({available} sheets)")]
    SheetMissing {
        path: PathBuf,
        index: usize,
        available: usize,
    },

    /// Sheet could not be read.
    #[error("failed to read sheet '{sheet}' of {path}: {message}")]
    WorkbookRead {
        path: PathBuf,
        sheet: String,
        message: String,
    },

    // === Metadata Errors ===
    /// Metadata table has unexpected shape.
    #[error("unexpected metadata format in {path}: {reason}")]
    MetadataFormat { path: PathBuf, reason: String },

    /// The same answer code is listed twice for one question.
    #[error(
        "duplicate answer code {code} for question '{question}' in {path} \
         (labels '{existing}' and '{duplicate}')"
    )]
    DuplicateDomainCode {
        path: PathBuf,
        question: String,
        code: i64,
        existing: String,
        duplicate: String,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/survey.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /data/survey.csv");
    }

    #[test]
    fn test_duplicate_code_names_context() {
        let err = IngestError::DuplicateDomainCode {
            path: PathBuf::from("labels.xlsx"),
            question: "Q1".to_string(),
            code: 2,
            existing: "Agree".to_string(),
            duplicate: "Disagree".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Q1"));
        assert!(message.contains("labels.xlsx"));
        assert!(message.contains("code 2"));
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("Q1".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
