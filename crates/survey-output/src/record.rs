//! Text rendering of one output row.

use survey_common::format_numeric;
use survey_model::PivotedRow;

/// Cells of a row in output column order. Missing values render empty.
pub(crate) fn row_cells(row: &PivotedRow) -> Vec<String> {
    let mut cells = Vec::with_capacity(row.attributes.len() + 11);
    cells.push(row.survey_name.clone());
    cells.push(row.year.clone());
    cells.extend(row.attributes.iter().map(|v| v.clone().unwrap_or_default()));
    cells.push(row.question_group_varname.clone());
    cells.push(row.question_group_text.clone());
    cells.push(row.question_varname.clone());
    cells.push(row.question_text.clone());
    cells.push(row.answer_value.clone().unwrap_or_default());
    cells.push(row.answer_text.clone().unwrap_or_default());
    cells.push(format_numeric(row.count_negative));
    cells.push(row.normalized_by_median.to_string());
    cells.push(row.weight.clone().unwrap_or_default());
    cells
}

/// Index of the first column after the attributes.
pub(crate) fn fixed_columns_start(attribute_count: usize) -> usize {
    2 + attribute_count
}
