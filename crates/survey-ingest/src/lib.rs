//! Survey data ingestion.
//!
//! Reads the wide survey table and the metadata that describes it into
//! Polars DataFrames, then builds the label and value-domain lookups the
//! pivot engine consumes.
//!
//! # Features
//!
//! - **Encoded CSV**: decode with any WHATWG encoding label, all columns as text
//! - **Workbooks**: read a sheet of xlsx/xls/ods metadata via calamine
//! - **Metadata**: variable labels with fallback warnings, value domains with
//!   forward-filled question names and duplicate-code detection
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use survey_ingest::{MetadataSource, load_survey_metadata, read_csv_table, table_column_names};
//! use survey_model::Diagnostics;
//!
//! let table = read_csv_table(Path::new("survey.csv"), "iso-8859-1")?;
//! let variables = table_column_names(&table);
//! let source = MetadataSource::Workbook("labels.xlsx".into());
//! let mut diagnostics = Diagnostics::new();
//! let metadata = load_survey_metadata(&source, &variables, &mut diagnostics)?;
//! ```

mod error;
mod metadata;
mod tables;

use polars::prelude::DataFrame;

// === Error Types ===
pub use error::{IngestError, Result};

// === Table Reading ===
pub use tables::{
    DEFAULT_SURVEY_ENCODING, read_csv_table, read_workbook_sheet, resolve_encoding,
    validate_table_shape,
};

// === Metadata ===
pub use metadata::{
    MetadataSource, MetadataTables, SurveyMetadata, VALUE_LABELS_SHEET, VARIABLE_LABELS_SHEET,
    load_domain_map, load_survey_metadata, load_variable_labels,
};

/// Column names of a table in order.
pub fn table_column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}
