//! Column classification: attributes versus questions.
//!
//! Variables following the question naming convention are questions. All
//! other variables are attributes, shown under their label. When two
//! attributes share a label, both get the variable name appended:
//! `"Age (Age)"` and `"Age (Age_2)"`.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use survey_model::{PivotSettings, VariableLabelMap};

/// How a variable takes part in the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableRole {
    /// Broadcast onto every output row.
    Attribute,
    /// Pivoted into answer rows.
    Question,
    /// Broadcast and pivoted.
    AttributeAndQuestion,
}

/// Ownership state of one attribute label.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LabelClaim {
    Unseen,
    /// One attribute uses the bare label. `position` indexes its display name.
    SeenOnce { variable: String, position: usize },
    /// The label collided and every holder carries its variable name.
    Resolved,
}

/// Result of partitioning the survey columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnClassification {
    /// Attribute display names in column order.
    pub attributes: Vec<String>,
    /// Original attribute variable names, aligned with `attributes`.
    pub attribute_variables: Vec<String>,
    /// Attribute variable name to display name.
    pub attributes_rename: BTreeMap<String, String>,
    /// Attributes that are not pivoted.
    pub dont_pivot: BTreeSet<String>,
    /// Variables to pivot, in column order.
    pub questions: Vec<String>,
}

impl ColumnClassification {
    pub fn display_name(&self, variable: &str) -> Option<&str> {
        self.attributes_rename.get(variable).map(String::as_str)
    }

    pub fn role(&self, variable: &str) -> VariableRole {
        match (
            self.attributes_rename.contains_key(variable),
            self.dont_pivot.contains(variable),
        ) {
            (true, true) => VariableRole::Attribute,
            (true, false) => VariableRole::AttributeAndQuestion,
            (false, _) => VariableRole::Question,
        }
    }
}

/// Variables that take part in the pivot: table columns minus ignored ones.
pub fn pivot_variables(columns: &[String], settings: &PivotSettings) -> Vec<String> {
    columns
        .iter()
        .filter(|name| !settings.is_ignored(name))
        .cloned()
        .collect()
}

/// Partitions `variables` into attributes and questions.
///
/// `variables` must already exclude ignored columns.
pub fn classify_columns(
    variables: &[String],
    labels: &VariableLabelMap,
    settings: &PivotSettings,
) -> ColumnClassification {
    let mut classification = ColumnClassification::default();
    let mut claims: BTreeMap<String, LabelClaim> = BTreeMap::new();
    let mut taken: BTreeSet<String> = BTreeSet::new();

    for variable in variables {
        if settings.is_question_name(variable) {
            continue;
        }
        let label = labels.label_or_name(variable).to_string();
        let claim = claims.entry(label.clone()).or_insert(LabelClaim::Unseen);

        let shown = match std::mem::replace(claim, LabelClaim::Resolved) {
            LabelClaim::Unseen if !taken.contains(&label) => {
                *claim = LabelClaim::SeenOnce {
                    variable: variable.clone(),
                    position: classification.attributes.len(),
                };
                label
            }
            LabelClaim::SeenOnce {
                variable: first,
                position,
            } => {
                taken.remove(&label);
                let renamed = unique_name(format!("{label} ({first})"), &first, &taken);
                taken.insert(renamed.clone());
                classification.attributes[position] = renamed.clone();
                classification.attributes_rename.insert(first, renamed);
                unique_name(format!("{label} ({variable})"), variable, &taken)
            }
            LabelClaim::Unseen | LabelClaim::Resolved => {
                unique_name(format!("{label} ({variable})"), variable, &taken)
            }
        };

        tracing::debug!(variable = %variable, shown = %shown, "Classified attribute");
        taken.insert(shown.clone());
        classification.attributes.push(shown.clone());
        classification.attribute_variables.push(variable.clone());
        classification
            .attributes_rename
            .insert(variable.clone(), shown);
        if !settings.is_dual_role(variable) {
            classification.dont_pivot.insert(variable.clone());
        }
    }

    classification.questions = variables
        .iter()
        .filter(|name| !classification.dont_pivot.contains(*name))
        .cloned()
        .collect();

    tracing::info!(
        attributes = classification.attributes.len(),
        questions = classification.questions.len(),
        "Classified survey columns"
    );
    classification
}

/// Appends the variable name until the candidate no longer clashes.
fn unique_name(mut candidate: String, variable: &str, taken: &BTreeSet<String>) -> String {
    while taken.contains(&candidate) {
        candidate = format!("{candidate} ({variable})");
    }
    candidate
}
