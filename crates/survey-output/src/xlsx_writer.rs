//! Excel output.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use survey_model::PivotedTable;

use crate::error::{OutputError, Result};
use crate::record::{fixed_columns_start, row_cells};

/// Rows per worksheet, header included.
pub const EXCEL_MAX_ROWS: usize = 1_048_576;
/// Columns per worksheet.
pub const EXCEL_MAX_COLUMNS: usize = 16_384;

const SHEET_NAME: &str = "pivoted";

/// Writes the table to a single-sheet workbook with a bold header row.
///
/// `count_negative` and `normalized_by_median` are stored as numbers, every
/// other cell as text so answer codes keep their exact form.
pub fn write_xlsx(table: &PivotedTable, path: &Path) -> Result<()> {
    let columns = table.column_names();
    if table.len() + 1 > EXCEL_MAX_ROWS {
        return Err(OutputError::TooManyRows {
            path: path.to_path_buf(),
            rows: table.len(),
            limit: EXCEL_MAX_ROWS - 1,
        });
    }
    if columns.len() > EXCEL_MAX_COLUMNS {
        return Err(OutputError::TooManyColumns {
            path: path.to_path_buf(),
            columns: columns.len(),
            limit: EXCEL_MAX_COLUMNS,
        });
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    fill_sheet(sheet, table, &columns).map_err(|source| OutputError::Xlsx {
        path: path.to_path_buf(),
        source,
    })?;
    workbook.save(path).map_err(|source| OutputError::Xlsx {
        path: path.to_path_buf(),
        source,
    })
}

fn fill_sheet(
    sheet: &mut Worksheet,
    table: &PivotedTable,
    columns: &[String],
) -> std::result::Result<(), XlsxError> {
    sheet.set_name(SHEET_NAME)?;
    let header = Format::new().set_bold();
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name, &header)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    let fixed = fixed_columns_start(table.attribute_names.len());
    let count_negative_col = fixed + 6;
    let normalized_col = fixed + 7;
    for (idx, row) in table.rows.iter().enumerate() {
        let sheet_row = (idx + 1) as u32;
        for (col, cell) in row_cells(row).into_iter().enumerate() {
            let sheet_col = col as u16;
            if col == count_negative_col {
                sheet.write_number(sheet_row, sheet_col, row.count_negative)?;
            } else if col == normalized_col {
                sheet.write_number(sheet_row, sheet_col, row.normalized_by_median as f64)?;
            } else if !cell.is_empty() {
                sheet.write_string(sheet_row, sheet_col, &cell)?;
            }
        }
    }
    Ok(())
}
