//! Output assembly: concatenate, drop blank answers, sort.

use survey_model::{PivotedRow, PivotedTable};

use crate::engine::{PivotBlock, has_answer};

/// Sorted output and the number of rows dropped on the way.
#[derive(Debug, Clone)]
pub struct AssembledOutput {
    pub table: PivotedTable,
    pub dropped_rows: usize,
}

/// Concatenates blocks in order, drops rows without an answer and stable
/// sorts by year, survey name and question identifier.
///
/// Within one question, rows keep respondent order.
pub fn assemble_output(attribute_names: Vec<String>, blocks: Vec<PivotBlock>) -> AssembledOutput {
    let total: usize = blocks.iter().map(|block| block.rows.len()).sum();
    let mut rows: Vec<PivotedRow> = blocks
        .into_iter()
        .flat_map(|block| block.rows)
        .filter(has_answer)
        .collect();
    let dropped_rows = total - rows.len();

    rows.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| a.survey_name.cmp(&b.survey_name))
            .then_with(|| a.question_varname.cmp(&b.question_varname))
    });

    tracing::info!(rows = rows.len(), dropped_rows, "Assembled pivoted rows");
    AssembledOutput {
        table: PivotedTable::new(attribute_names, rows),
        dropped_rows,
    }
}
