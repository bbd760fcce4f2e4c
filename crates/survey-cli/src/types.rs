use std::path::PathBuf;

use survey_model::{OutputFormat, PivotWarning};

#[derive(Debug)]
pub struct RunResult {
    pub survey_name: String,
    pub year: String,
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub written: bool,
    pub respondents: usize,
    pub attributes: usize,
    pub questions: usize,
    pub groups: usize,
    pub rows: usize,
    pub dropped_rows: usize,
    pub warnings: Vec<PivotWarning>,
}
