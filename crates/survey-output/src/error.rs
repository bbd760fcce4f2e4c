//! Error types for output writing.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to create or write the output file.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write Excel workbook {path}: {source}")]
    Xlsx {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// Output does not fit in one worksheet.
    #[error("{rows} rows exceed the Excel sheet limit of {limit} for {path}")]
    TooManyRows {
        path: PathBuf,
        rows: usize,
        limit: usize,
    },

    #[error("{columns} columns exceed the Excel sheet limit of {limit} for {path}")]
    TooManyColumns {
        path: PathBuf,
        columns: usize,
        limit: usize,
    },
}

pub type Result<T> = std::result::Result<T, OutputError>;
