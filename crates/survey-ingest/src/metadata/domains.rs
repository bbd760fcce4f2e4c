//! Value domain loading from a Question/Value/Label table.

use std::path::Path;

use polars::prelude::DataFrame;
use survey_common::{any_to_code, any_to_string};
use survey_model::DomainMap;

use crate::error::{IngestError, Result};

/// Builds the domain map from a table whose first three columns are
/// question, code and label.
///
/// The question column is sparse: a blank cell continues the last question
/// seen. Rows without a usable integer code or without a label are skipped.
/// A code listed twice for one question is an error.
pub fn load_domain_map(table: &DataFrame, origin: &Path) -> Result<DomainMap> {
    let columns = table.get_columns();
    let [question_col, code_col, label_col, ..] = columns else {
        return Err(IngestError::MetadataFormat {
            path: origin.to_path_buf(),
            reason: format!(
                "value label table needs question, value and label columns, found {}",
                columns.len()
            ),
        });
    };

    let mut domains = DomainMap::new();
    let mut current_question = String::new();
    let mut skipped = 0usize;
    for row_idx in 0..table.height() {
        let question = any_to_string(question_col.get(row_idx)?);
        if !question.trim().is_empty() {
            current_question = question.trim().to_string();
        }
        if current_question.is_empty() {
            skipped += 1;
            continue;
        }

        let Some(code) = any_to_code(code_col.get(row_idx)?) else {
            skipped += 1;
            continue;
        };
        let label = any_to_string(label_col.get(row_idx)?);
        if label.trim().is_empty() {
            skipped += 1;
            continue;
        }

        if let Some(existing) = domains.domain_mut(&current_question).insert(code, label.clone()) {
            return Err(IngestError::DuplicateDomainCode {
                path: origin.to_path_buf(),
                question: current_question,
                code,
                existing: existing.to_string(),
                duplicate: label,
            });
        }
    }

    tracing::info!(
        path = %origin.display(),
        questions = domains.len(),
        skipped_rows = skipped,
        "Loaded value domains"
    );
    Ok(domains)
}
