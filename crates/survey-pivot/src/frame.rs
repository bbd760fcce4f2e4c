//! DataFrame view of the pivoted table.

use polars::prelude::{Column, DataFrame};
use survey_model::{PivotedRow, PivotedTable, SURVEY_NAME_COLUMN, YEAR_COLUMN};

use crate::error::Result;

fn text_column(name: &str, rows: &[PivotedRow], f: impl Fn(&PivotedRow) -> &str) -> Column {
    let values: Vec<&str> = rows.iter().map(f).collect();
    Column::new(name.into(), values)
}

fn optional_column(
    name: &str,
    rows: &[PivotedRow],
    f: impl Fn(&PivotedRow) -> Option<&str>,
) -> Column {
    let values: Vec<Option<&str>> = rows.iter().map(f).collect();
    Column::new(name.into(), values)
}

/// Builds a DataFrame with the output column order.
///
/// Numeric properties are typed: `count_negative` as Float64,
/// `normalized_by_median` as Int64. Everything else is text.
pub fn pivoted_frame(table: &PivotedTable) -> Result<DataFrame> {
    let rows = table.rows.as_slice();
    let mut columns = Vec::with_capacity(table.attribute_names.len() + 11);
    columns.push(text_column(SURVEY_NAME_COLUMN, rows, |r| {
        r.survey_name.as_str()
    }));
    columns.push(text_column(YEAR_COLUMN, rows, |r| r.year.as_str()));
    for (idx, name) in table.attribute_names.iter().enumerate() {
        columns.push(optional_column(name, rows, |r| {
            r.attributes.get(idx).and_then(|value| value.as_deref())
        }));
    }
    columns.push(text_column("question_group_varname", rows, |r| {
        r.question_group_varname.as_str()
    }));
    columns.push(text_column("question_group_text", rows, |r| {
        r.question_group_text.as_str()
    }));
    columns.push(text_column("question_varname", rows, |r| r.question_varname.as_str()));
    columns.push(text_column("question_text", rows, |r| r.question_text.as_str()));
    columns.push(optional_column("answer_value", rows, |r| r.answer_value.as_deref()));
    columns.push(optional_column("answer_text", rows, |r| r.answer_text.as_deref()));
    let count_negative: Vec<f64> = rows.iter().map(|r| r.count_negative).collect();
    columns.push(Column::new("count_negative".into(), count_negative));
    let normalized: Vec<i64> = rows.iter().map(|r| r.normalized_by_median).collect();
    columns.push(Column::new("normalized_by_median".into(), normalized));
    columns.push(optional_column("weight", rows, |r| r.weight.as_deref()));

    Ok(DataFrame::new(columns)?)
}
