//! CSV output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use survey_model::PivotedTable;

use crate::error::{OutputError, Result};
use crate::record::row_cells;

/// Writes the table as UTF-8 CSV with a header row.
pub fn write_csv(table: &PivotedTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv_to(table, BufWriter::new(file)).map_err(|source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the table as CSV to any writer.
pub fn write_csv_to<W: Write>(table: &PivotedTable, writer: W) -> csv::Result<()> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(table.column_names())?;
    for row in &table.rows {
        out.write_record(row_cells(row))?;
    }
    out.flush()?;
    Ok(())
}
