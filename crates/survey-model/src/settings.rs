//! Settings that drive one pivot run.

use serde::{Deserialize, Serialize};

/// Prefix that marks a column as a survey question unless configured otherwise.
pub const DEFAULT_QUESTION_PREFIX: &str = "Q";

/// Options controlling how a wide survey table is pivoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotSettings {
    /// Survey identifier written to every output row.
    pub survey_name: String,

    /// Survey year, kept as text.
    pub year: String,

    /// Column holding respondent weights. Rows get weight `1` when unset or
    /// when the column is absent from the table.
    pub weight_column: Option<String>,

    /// Columns dropped before classification.
    pub ignore_columns: Vec<String>,

    /// Attribute columns that are pivoted as questions as well.
    pub dual_role_columns: Vec<String>,

    /// Answer labels removed from a domain before its derived properties are
    /// computed. Compared case-insensitively.
    pub exclude_from_analysis: Vec<String>,

    /// Minimum length, in characters, a shared question prefix needs before
    /// it is used as the group text.
    pub common_prefix_threshold: usize,

    /// Columns starting with this prefix are questions; all others are
    /// attributes.
    pub question_prefix: String,
}

impl Default for PivotSettings {
    fn default() -> Self {
        Self {
            survey_name: String::new(),
            year: String::new(),
            weight_column: None,
            ignore_columns: Vec::new(),
            dual_role_columns: Vec::new(),
            exclude_from_analysis: Vec::new(),
            common_prefix_threshold: 0,
            question_prefix: DEFAULT_QUESTION_PREFIX.to_string(),
        }
    }
}

impl PivotSettings {
    pub fn new(survey_name: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            survey_name: survey_name.into(),
            year: year.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_weight_column(mut self, column: Option<String>) -> Self {
        self.weight_column = column;
        self
    }

    #[must_use]
    pub fn with_ignore_columns(mut self, columns: Vec<String>) -> Self {
        self.ignore_columns = columns;
        self
    }

    #[must_use]
    pub fn with_dual_role_columns(mut self, columns: Vec<String>) -> Self {
        self.dual_role_columns = columns;
        self
    }

    #[must_use]
    pub fn with_exclude_from_analysis(mut self, labels: Vec<String>) -> Self {
        self.exclude_from_analysis = labels;
        self
    }

    #[must_use]
    pub fn with_common_prefix_threshold(mut self, threshold: usize) -> Self {
        self.common_prefix_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_question_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.question_prefix = prefix.into();
        self
    }

    /// True when the variable name follows the question naming convention.
    pub fn is_question_name(&self, variable: &str) -> bool {
        variable.starts_with(&self.question_prefix)
    }

    pub fn is_ignored(&self, variable: &str) -> bool {
        self.ignore_columns.iter().any(|c| c == variable)
    }

    pub fn is_dual_role(&self, variable: &str) -> bool {
        self.dual_role_columns.iter().any(|c| c == variable)
    }

    /// True when an answer label is excluded from derived-property analysis.
    pub fn is_excluded_label(&self, label: &str) -> bool {
        let label = label.trim().to_lowercase();
        self.exclude_from_analysis
            .iter()
            .any(|excluded| excluded.trim().to_lowercase() == label)
    }
}
