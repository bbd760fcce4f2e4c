//! Table readers. Every reader yields a DataFrame of `String` columns with
//! cleaned cell text.

mod csv;
mod workbook;

use std::path::Path;

use polars::prelude::{Column, DataFrame};
use survey_common::clean_cell_text;

use crate::error::{IngestError, Result};

pub use csv::{DEFAULT_SURVEY_ENCODING, read_csv_table, resolve_encoding};
pub use workbook::read_workbook_sheet;

/// Rejects tables without columns or with blank column names. A table with
/// a header and no rows is a survey without respondents and passes.
pub fn validate_table_shape(df: &DataFrame, path: &Path) -> Result<()> {
    if df.width() == 0 {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    if df.width() > 2000 {
        tracing::warn!(
            path = %path.display(),
            columns = df.width(),
            "Survey table has more than 2000 columns"
        );
    }

    for name in df.get_column_names() {
        if name.trim().is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}

/// Replaces embedded line breaks and tabs in every string cell.
pub(crate) fn clean_table(df: &DataFrame) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let values = column.str()?;
        let cleaned: Vec<Option<String>> = values
            .iter()
            .map(|value| value.map(clean_cell_text))
            .collect();
        columns.push(Column::new(column.name().clone(), cleaned));
    }
    Ok(DataFrame::new(columns)?)
}
