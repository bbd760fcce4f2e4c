//! Writers for pivoted survey rows.
//!
//! - **CSV**: UTF-8, header row, missing values as empty fields
//! - **Excel**: one `pivoted` sheet, bold frozen header, numeric properties as numbers

mod csv_writer;
mod error;
mod record;
mod xlsx_writer;

use std::path::{Path, PathBuf};

use survey_model::{OutputFormat, PivotedTable};

pub use csv_writer::{write_csv, write_csv_to};
pub use error::{OutputError, Result};
pub use xlsx_writer::{EXCEL_MAX_COLUMNS, EXCEL_MAX_ROWS, write_xlsx};

/// Default output file name: `{year}_{survey name}_pivoted.{ext}`, with the
/// survey name lowercased and spaces turned into underscores.
///
/// # Examples
///
/// ```
/// use survey_model::OutputFormat;
/// use survey_output::default_output_filename;
///
/// assert_eq!(
///     default_output_filename("2023", "Staff Survey", OutputFormat::Csv),
///     "2023_staff_survey_pivoted.csv"
/// );
/// ```
pub fn default_output_filename(year: &str, survey_name: &str, format: OutputFormat) -> String {
    format!(
        "{year}_{}_pivoted.{}",
        survey_name.to_lowercase().replace(' ', "_"),
        format.extension()
    )
}

/// Writes the table in `format`, creating the parent directory if needed.
pub fn write_pivoted(table: &PivotedTable, path: &Path, format: OutputFormat) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    match format {
        OutputFormat::Csv => write_csv(table, path)?,
        OutputFormat::Xlsx => write_xlsx(table, path)?,
    }
    tracing::info!(
        path = %path.display(),
        format = format.extension(),
        rows = table.len(),
        "Wrote pivoted output"
    );
    Ok(path.to_path_buf())
}
