//! Survey metadata: variable labels and answer value domains.

mod domains;
mod labels;
mod source;

use survey_model::{Diagnostics, DomainMap, VariableLabelMap};

use crate::error::Result;

pub use domains::load_domain_map;
pub use labels::load_variable_labels;
pub use source::{MetadataSource, MetadataTables, VALUE_LABELS_SHEET, VARIABLE_LABELS_SHEET};

/// Labels and domains for one survey.
#[derive(Debug, Clone, Default)]
pub struct SurveyMetadata {
    pub labels: VariableLabelMap,
    pub domains: DomainMap,
}

/// Reads both metadata tables and resolves labels for `variables`.
pub fn load_survey_metadata(
    source: &MetadataSource,
    variables: &[String],
    diagnostics: &mut Diagnostics,
) -> Result<SurveyMetadata> {
    let tables = source.read_tables()?;
    let domains = load_domain_map(&tables.value_labels, &tables.value_labels_origin)?;
    let labels = load_variable_labels(
        &tables.variable_labels,
        &tables.variable_labels_origin,
        variables,
        diagnostics,
    )?;
    Ok(SurveyMetadata { labels, domains })
}
