//! Variable label loading from a Name/Label table.

use std::collections::BTreeMap;
use std::path::Path;

use polars::prelude::DataFrame;
use survey_common::any_to_string;
use survey_model::{Diagnostics, PivotWarning, VariableLabelMap};

use crate::error::{IngestError, Result};

/// Builds labels for `variables` from a table whose first two columns are
/// variable name and label.
///
/// A variable without a label gets its own name and a `MissingLabel`
/// warning. When a name appears twice, the later row wins.
pub fn load_variable_labels(
    table: &DataFrame,
    origin: &Path,
    variables: &[String],
    diagnostics: &mut Diagnostics,
) -> Result<VariableLabelMap> {
    let columns = table.get_columns();
    let (Some(name_col), Some(label_col)) = (columns.first(), columns.get(1)) else {
        return Err(IngestError::MetadataFormat {
            path: origin.to_path_buf(),
            reason: format!(
                "variable label table needs name and label columns, found {}",
                columns.len()
            ),
        });
    };

    let mut known = BTreeMap::new();
    for row_idx in 0..table.height() {
        let name = any_to_string(name_col.get(row_idx)?);
        let label = any_to_string(label_col.get(row_idx)?);
        let name = name.trim();
        if name.is_empty() || label.trim().is_empty() {
            continue;
        }
        known.insert(name.to_string(), label);
    }

    let mut labels = VariableLabelMap::new();
    for variable in variables {
        match known.get(variable.as_str()) {
            Some(label) => labels.insert(variable.clone(), label.clone()),
            None => {
                diagnostics.push(PivotWarning::MissingLabel {
                    variable: variable.clone(),
                });
                labels.insert(variable.clone(), variable.clone());
            }
        }
    }

    tracing::info!(
        path = %origin.display(),
        available = known.len(),
        requested = variables.len(),
        "Loaded variable labels"
    );
    Ok(labels)
}
