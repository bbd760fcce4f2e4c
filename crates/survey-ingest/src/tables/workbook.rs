//! Spreadsheet sheet reading via calamine (xlsx, xls, xlsb, ods).

use std::collections::BTreeSet;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::{Column, DataFrame};
use survey_common::{clean_cell_text, format_numeric};

use crate::error::{IngestError, Result};

/// Reads the sheet at `index` into a DataFrame of text columns.
///
/// The first row is the header. Numeric cells render without a trailing
/// `.0`, so codes typed into Excel come back as `"2"`, not `"2.0"`.
pub fn read_workbook_sheet(path: &Path, index: usize) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::WorkbookOpen {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let sheet_names = workbook.sheet_names();
    let Some(sheet) = sheet_names.get(index).cloned() else {
        return Err(IngestError::SheetMissing {
            path: path.to_path_buf(),
            index,
            available: sheet_names.len(),
        });
    };
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| IngestError::WorkbookRead {
            path: path.to_path_buf(),
            sheet: sheet.clone(),
            message: e.to_string(),
        })?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    };
    let names = header_names(header);
    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (idx, column) in values.iter_mut().enumerate() {
            column.push(row.get(idx).and_then(cell_text));
        }
    }

    let columns: Vec<Column> = names
        .into_iter()
        .zip(values)
        .map(|(name, cells)| Column::new(name.into(), cells))
        .collect();
    let df = DataFrame::new(columns)?;

    tracing::debug!(
        path = %path.display(),
        sheet = %sheet,
        rows = df.height(),
        columns = df.width(),
        "Read workbook sheet"
    );
    Ok(df)
}

/// Header names with blanks and repeats made unique by position.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = cell_text(cell)
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| format!("column_{}", idx + 1));
            if seen.insert(name.clone()) {
                name
            } else {
                let unique = format!("{name}_{}", idx + 1);
                seen.insert(unique.clone());
                unique
            }
        })
        .collect()
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(clean_cell_text(s)),
        Data::Float(v) => Some(format_numeric(*v)),
        Data::Int(v) => Some(v.to_string()),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Data::Error(e) => {
            tracing::debug!(error = %e, "Skipping spreadsheet error cell");
            None
        }
        other => Some(other.to_string()),
    }
}
