//! CSV reading with an explicit source encoding.

use std::io::Cursor;
use std::path::Path;

use encoding_rs::Encoding;
use polars::prelude::{CsvReadOptions, DataFrame, SerReader};

use crate::error::{IngestError, Result};

use super::{clean_table, validate_table_shape};

/// Encoding survey exports are written in unless configured otherwise.
pub const DEFAULT_SURVEY_ENCODING: &str = "iso-8859-1";

/// Resolves a WHATWG encoding label such as `utf-8`, `latin1` or `iso-8859-1`.
///
/// Note that WHATWG maps the ISO-8859-1 labels to windows-1252.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| IngestError::UnsupportedEncoding {
        encoding: label.to_string(),
    })
}

/// Reads a CSV file into a DataFrame with every column typed as text.
///
/// The bytes are decoded with `encoding` first (a byte order mark overrides
/// it), so answer codes such as `"07"` survive verbatim.
pub fn read_csv_table(path: &Path, encoding: &str) -> Result<DataFrame> {
    let encoding = resolve_encoding(encoding)?;
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let (text, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        tracing::warn!(
            path = %path.display(),
            encoding = used.name(),
            "Input contained bytes invalid for the encoding; they were replaced"
        );
    }
    if text.trim().is_empty() {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    validate_table_shape(&df, path)?;
    let df = clean_table(&df)?;

    tracing::debug!(
        path = %path.display(),
        encoding = used.name(),
        rows = df.height(),
        columns = df.width(),
        "Read CSV table"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    fn cell(df: &DataFrame, column: &str, row: usize) -> Option<String> {
        df.column(column)
            .unwrap()
            .str()
            .unwrap()
            .get(row)
            .map(str::to_string)
    }

    #[test]
    fn test_read_csv_table_keeps_codes_as_text() {
        let file = create_temp_csv(b"ID,Q1,Q2\n1,01,5\n2,,3\n");
        let df = read_csv_table(file.path(), "utf-8").unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert_eq!(cell(&df, "Q1", 0), Some("01".to_string()));
        assert_eq!(cell(&df, "Q1", 1), None);
        assert_eq!(cell(&df, "Q2", 1), Some("3".to_string()));
    }

    #[test]
    fn test_read_csv_table_decodes_latin1() {
        // "Région" with é as a single 0xE9 byte
        let file = create_temp_csv(b"ID,R\xe9gion\n1,Qu\xe9bec\n");
        let df = read_csv_table(file.path(), DEFAULT_SURVEY_ENCODING).unwrap();

        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["ID", "Région"]);
        assert_eq!(cell(&df, "Région", 0), Some("Québec".to_string()));
    }

    #[test]
    fn test_read_csv_table_cleans_embedded_newlines() {
        let file = create_temp_csv(b"ID,Comment\n1,\"line one\nline two\"\n");
        let df = read_csv_table(file.path(), "utf-8").unwrap();

        assert_eq!(
            cell(&df, "Comment", 0),
            Some("line one, line two".to_string())
        );
    }

    #[test]
    fn test_read_csv_table_strips_bom() {
        let file = create_temp_csv("\u{feff}ID,Q1\n1,2\n".as_bytes());
        let df = read_csv_table(file.path(), "utf-8").unwrap();

        assert!(df.column("ID").is_ok());
    }

    #[test]
    fn test_read_csv_table_missing_file() {
        let result = read_csv_table(Path::new("/nonexistent/survey.csv"), "utf-8");
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_csv_table_empty_file() {
        let file = create_temp_csv(b"");
        let result = read_csv_table(file.path(), "utf-8");
        assert!(matches!(result, Err(IngestError::EmptyTable { .. })));
    }

    #[test]
    fn test_read_csv_table_header_only() {
        let file = create_temp_csv(b"ID,Q1\n");
        let df = read_csv_table(file.path(), "utf-8").unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
        assert!(df.column("Q1").is_ok());
    }

    #[test]
    fn test_unknown_encoding() {
        let result = resolve_encoding("klingon-8");
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding { .. })
        ));
        assert_eq!(resolve_encoding("latin1").unwrap().name(), "windows-1252");
    }
}
