//! Where survey metadata comes from.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;

use crate::error::Result;
use crate::tables::{read_csv_table, read_workbook_sheet};

/// Sheet holding question/value/label rows in a metadata workbook.
pub const VALUE_LABELS_SHEET: usize = 0;
/// Sheet holding name/label rows in a metadata workbook.
pub const VARIABLE_LABELS_SHEET: usize = 1;

/// Location of the two metadata tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataSource {
    /// One spreadsheet: value labels on the first sheet, variable labels on
    /// the second.
    Workbook(PathBuf),
    /// Two UTF-8 CSV files.
    CsvFiles {
        variable_labels: PathBuf,
        value_labels: PathBuf,
    },
}

/// The raw metadata tables and the files they were read from.
#[derive(Debug)]
pub struct MetadataTables {
    pub variable_labels: DataFrame,
    pub variable_labels_origin: PathBuf,
    pub value_labels: DataFrame,
    pub value_labels_origin: PathBuf,
}

impl MetadataSource {
    pub fn read_tables(&self) -> Result<MetadataTables> {
        match self {
            MetadataSource::Workbook(path) => Ok(MetadataTables {
                variable_labels: read_workbook_sheet(path, VARIABLE_LABELS_SHEET)?,
                variable_labels_origin: path.clone(),
                value_labels: read_workbook_sheet(path, VALUE_LABELS_SHEET)?,
                value_labels_origin: path.clone(),
            }),
            MetadataSource::CsvFiles {
                variable_labels,
                value_labels,
            } => Ok(MetadataTables {
                variable_labels: read_csv_table(variable_labels, "utf-8")?,
                variable_labels_origin: variable_labels.clone(),
                value_labels: read_csv_table(value_labels, "utf-8")?,
                value_labels_origin: value_labels.clone(),
            }),
        }
    }

    /// Path shown in logs and summaries.
    pub fn display_path(&self) -> &Path {
        match self {
            MetadataSource::Workbook(path) => path,
            MetadataSource::CsvFiles { value_labels, .. } => value_labels,
        }
    }
}
