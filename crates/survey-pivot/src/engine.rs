//! The pivot engine: one block of long-format rows per question.

use survey_common::{is_blank, is_numeric_code};
use survey_model::{
    Checkpoint, Diagnostics, DomainMap, PivotSettings, PivotWarning, PivotedRow, PivotedTable,
    ValueDomain, VariableLabelMap,
};

use crate::assemble::assemble_output;
use crate::classify::{ColumnClassification, classify_columns, pivot_variables};
use crate::domain::DomainAnalysis;
use crate::error::{PivotError, Result};
use crate::grouping::GroupMap;
use crate::source::{QuestionSource, SurveySource};

/// Weight given to every respondent when no weight column is available.
pub const DEFAULT_WEIGHT: &str = "1";

/// Everything a pivot run reads. Nothing here is modified.
pub struct PivotInput<'a, S: SurveySource + ?Sized> {
    pub source: &'a S,
    pub labels: &'a VariableLabelMap,
    pub domains: &'a DomainMap,
    pub settings: &'a PivotSettings,
}

/// Progress hooks called while questions are pivoted.
pub trait PivotObserver {
    fn on_start(&mut self, _questions: usize) {}
    fn on_question(&mut self, _question: &str, _rows: usize) {}
    fn on_finish(&mut self) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PivotObserver for NoopObserver {}

/// Rows produced for one question, before filtering and sorting.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotBlock {
    pub question: String,
    pub rows: Vec<PivotedRow>,
}

/// Result of a full pivot run.
#[derive(Debug, Clone)]
pub struct PivotOutcome {
    pub table: PivotedTable,
    pub classification: ColumnClassification,
    pub respondents: usize,
    /// Rows removed because their answer was blank.
    pub dropped_rows: usize,
    pub groups: usize,
}

/// Classifies the columns of `source` after removing ignored ones.
pub fn classify_survey<S: SurveySource + ?Sized>(
    source: &S,
    labels: &VariableLabelMap,
    settings: &PivotSettings,
) -> ColumnClassification {
    let variables = pivot_variables(&source.variable_names(), settings);
    classify_columns(&variables, labels, settings)
}

/// Classifies, pivots and assembles a survey.
///
/// Pending diagnostics are flushed after classification and after pivoting.
pub fn run_pivot<S: SurveySource + ?Sized>(
    input: &PivotInput<'_, S>,
    observer: &mut dyn PivotObserver,
    diagnostics: &mut Diagnostics,
) -> Result<PivotOutcome> {
    let classification = classify_survey(input.source, input.labels, input.settings);
    diagnostics.flush(Checkpoint::ColumnsClassified);

    let (blocks, groups) = pivot_questions(input, &classification, observer, diagnostics)?;
    diagnostics.flush(Checkpoint::Pivoted);

    let assembled = assemble_output(classification.attributes.clone(), blocks);
    Ok(PivotOutcome {
        table: assembled.table,
        classification,
        respondents: input.source.respondent_count(),
        dropped_rows: assembled.dropped_rows,
        groups: groups.len(),
    })
}

/// Pivots every question of `classification` into its own block.
///
/// After all questions are processed, each row's group text is replaced by
/// the final text of its group. Returns the blocks in question order along
/// with the group map.
pub fn pivot_questions<S: SurveySource + ?Sized>(
    input: &PivotInput<'_, S>,
    classification: &ColumnClassification,
    observer: &mut dyn PivotObserver,
    diagnostics: &mut Diagnostics,
) -> Result<(Vec<PivotBlock>, GroupMap)> {
    let respondents = input.source.respondent_count();
    let attributes = attribute_values(input.source, classification, respondents, diagnostics)?;
    let weights = weight_values(input.source, input.settings, respondents, diagnostics)?;
    let mut groups = GroupMap::new(input.settings.common_prefix_threshold);
    let mut blocks = Vec::with_capacity(classification.questions.len());

    observer.on_start(classification.questions.len());
    for variable in &classification.questions {
        let question = question_source(input, classification, variable)?;
        let domain = input.domains.get(&question.variable);
        let answers = label_answers(&question, domain)?;
        let analysis = DomainAnalysis::of(&question.variable, domain, input.settings);
        if let Some(warning) = analysis.warning.clone() {
            diagnostics.push(warning);
        }
        let group = groups.assign(&question.identifier, &question.text);

        let mut rows = Vec::with_capacity(respondents);
        for (idx, (value, text)) in question.values.iter().zip(answers).enumerate() {
            rows.push(PivotedRow {
                survey_name: input.settings.survey_name.clone(),
                year: input.settings.year.clone(),
                attributes: attributes.iter().map(|column| column[idx].clone()).collect(),
                question_group_varname: group.key.clone(),
                question_group_text: group.text.clone(),
                question_varname: question.identifier.clone(),
                question_text: question.text.clone(),
                answer_value: value.clone(),
                answer_text: text,
                count_negative: analysis.count_negative_for(value.as_deref()),
                normalized_by_median: analysis.normalized_by_median_for(value.as_deref()),
                weight: weights[idx].clone(),
            });
        }

        tracing::debug!(
            question = %question.identifier,
            group = %group.key,
            domain_size = domain.map_or(0, ValueDomain::len),
            rows = rows.len(),
            "Pivoted question"
        );
        observer.on_question(&question.identifier, rows.len());
        blocks.push(PivotBlock {
            question: question.identifier,
            rows,
        });
    }

    for block in &mut blocks {
        groups.revise(&mut block.rows);
    }
    observer.on_finish();

    tracing::info!(
        questions = blocks.len(),
        groups = groups.len(),
        respondents,
        "Pivoted survey questions"
    );
    Ok((blocks, groups))
}

/// Normalises one question column for the engine.
fn question_source<S: SurveySource + ?Sized>(
    input: &PivotInput<'_, S>,
    classification: &ColumnClassification,
    variable: &str,
) -> Result<QuestionSource> {
    let values = input
        .source
        .variable_values(variable)?
        .ok_or_else(|| PivotError::ColumnNotFound {
            column: variable.to_string(),
        })?;
    let (identifier, text) = match classification.display_name(variable) {
        Some(display) => (display.to_string(), display.to_string()),
        None => (
            variable.to_string(),
            input.labels.label_or_name(variable).to_string(),
        ),
    };
    Ok(QuestionSource {
        identifier,
        text,
        variable: variable.to_string(),
        values,
    })
}

/// Maps raw answers to their labels.
///
/// A numeric answer must be in a non-empty domain. Other answers, and every
/// answer of a question without a domain, keep their raw text.
pub fn label_answers(
    question: &QuestionSource,
    domain: Option<&ValueDomain>,
) -> Result<Vec<Option<String>>> {
    let domain = domain.filter(|domain| !domain.is_empty());
    question
        .values
        .iter()
        .map(|value| {
            let Some(raw) = value else {
                return Ok(None);
            };
            match domain {
                Some(domain) if is_numeric_code(raw) => domain
                    .label_for_text(raw)
                    .map(|label| Some(label.to_string()))
                    .ok_or_else(|| PivotError::MissingValueMapping {
                        variable: question.variable.clone(),
                        code: raw.trim().to_string(),
                    }),
                _ => Ok(Some(raw.clone())),
            }
        })
        .collect()
}

/// Attribute columns aligned with `classification.attributes`.
///
/// An attribute missing from the source yields empty cells and a warning.
fn attribute_values<S: SurveySource + ?Sized>(
    source: &S,
    classification: &ColumnClassification,
    respondents: usize,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Vec<Option<String>>>> {
    let mut columns = Vec::with_capacity(classification.attribute_variables.len());
    for variable in &classification.attribute_variables {
        match source.variable_values(variable)? {
            Some(values) => columns.push(values),
            None => {
                diagnostics.push(PivotWarning::AttributeColumnMissing {
                    column: variable.clone(),
                });
                columns.push(vec![None; respondents]);
            }
        }
    }
    Ok(columns)
}

/// Respondent weights as raw text, defaulting to [`DEFAULT_WEIGHT`].
///
/// A configured weight column missing from the source is reported.
fn weight_values<S: SurveySource + ?Sized>(
    source: &S,
    settings: &PivotSettings,
    respondents: usize,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Option<String>>> {
    let default = || vec![Some(DEFAULT_WEIGHT.to_string()); respondents];
    let Some(column) = settings.weight_column.as_deref() else {
        return Ok(default());
    };
    match source.variable_values(column)? {
        Some(values) => Ok(values),
        None => {
            diagnostics.push(PivotWarning::WeightColumnMissing {
                column: column.to_string(),
            });
            Ok(default())
        }
    }
}

/// True when the row carries an answer worth keeping.
pub(crate) fn has_answer(row: &PivotedRow) -> bool {
    !is_blank(row.answer_value.as_deref()) && !is_blank(row.answer_text.as_deref())
}
