//! Column access the engine pivots from.
//!
//! The engine never touches a concrete table type. A wide survey only has to
//! expose its columns as optional text cells; the coded CSV table does this
//! through its DataFrame, and other survey formats can do the same once
//! their variable names, labels and values have been read.

use polars::prelude::DataFrame;

use crate::error::Result;

/// A wide survey: one row per respondent, one column per variable.
pub trait SurveySource {
    /// Number of respondents.
    fn respondent_count(&self) -> usize;

    /// Variable names in column order.
    fn variable_names(&self) -> Vec<String>;

    /// Raw cells of a variable, or `None` when the variable is absent.
    fn variable_values(&self, variable: &str) -> Result<Option<Vec<Option<String>>>>;
}

impl SurveySource for DataFrame {
    fn respondent_count(&self) -> usize {
        self.height()
    }

    fn variable_names(&self) -> Vec<String> {
        self.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    fn variable_values(&self, variable: &str) -> Result<Option<Vec<Option<String>>>> {
        let Ok(column) = self.column(variable) else {
            return Ok(None);
        };
        let column = column.cast(&polars::prelude::DataType::String)?;
        let values = column
            .str()?
            .iter()
            .map(|value| value.map(str::to_string))
            .collect();
        Ok(Some(values))
    }
}

/// One question in the form the engine pivots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSource {
    /// Output question identifier. The display name for a variable that is
    /// also an attribute, otherwise the variable name.
    pub identifier: String,
    /// Question text shown next to each answer.
    pub text: String,
    /// Variable name the value domain is keyed by.
    pub variable: String,
    /// Raw answers, one per respondent.
    pub values: Vec<Option<String>>,
}
