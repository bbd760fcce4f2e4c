//! Long-format output rows.

use serde::Serialize;

pub const SURVEY_NAME_COLUMN: &str = "survey_name";
pub const YEAR_COLUMN: &str = "year";

/// Output columns that follow the attribute columns, in order.
pub const OUTPUT_COLUMNS_AFTER_ATTRIBUTES: [&str; 9] = [
    "question_group_varname",
    "question_group_text",
    "question_varname",
    "question_text",
    "answer_value",
    "answer_text",
    "count_negative",
    "normalized_by_median",
    "weight",
];

/// One respondent's answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotedRow {
    pub survey_name: String,
    pub year: String,
    /// Attribute values, aligned with [`PivotedTable::attribute_names`].
    pub attributes: Vec<Option<String>>,
    pub question_group_varname: String,
    pub question_group_text: String,
    pub question_varname: String,
    pub question_text: String,
    pub answer_value: Option<String>,
    pub answer_text: Option<String>,
    /// 1 below the domain median, 0 above it, 0.5 on it.
    pub count_negative: f64,
    pub normalized_by_median: i64,
    pub weight: Option<String>,
}

/// The assembled, sorted pivot result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PivotedTable {
    /// Attribute display names in classifier order.
    pub attribute_names: Vec<String>,
    pub rows: Vec<PivotedRow>,
}

impl PivotedTable {
    pub fn new(attribute_names: Vec<String>, rows: Vec<PivotedRow>) -> Self {
        Self {
            attribute_names,
            rows,
        }
    }

    /// Output header: survey name, year, attributes, then the fixed columns.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(2 + self.attribute_names.len() + 9);
        names.push(SURVEY_NAME_COLUMN.to_string());
        names.push(YEAR_COLUMN.to_string());
        names.extend(self.attribute_names.iter().cloned());
        names.extend(OUTPUT_COLUMNS_AFTER_ATTRIBUTES.iter().map(|c| (*c).to_string()));
        names
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct question identifiers present in the rows.
    pub fn question_count(&self) -> usize {
        let mut questions: Vec<&str> = self
            .rows
            .iter()
            .map(|row| row.question_varname.as_str())
            .collect();
        questions.sort_unstable();
        questions.dedup();
        questions.len()
    }
}
