//! Wide-to-long survey pivot.
//!
//! Takes a wide survey (one row per respondent, one column per variable)
//! plus its label and value-domain metadata, and produces one row per
//! respondent and question, enriched with question text, answer labels,
//! question groups and two median-based answer properties.
//!
//! Stages, in run order:
//!
//! 1. [`classify_columns`]: attributes versus questions, unique display names
//! 2. [`pivot_questions`]: per question, label answers, analyse the domain
//!    ([`DomainAnalysis`]) and fold the question into its group ([`GroupMap`])
//! 3. [`assemble_output`]: drop blank answers and sort
//!
//! [`run_pivot`] chains all three.

mod assemble;
mod classify;
mod domain;
mod engine;
mod error;
mod frame;
mod grouping;
mod source;

// === Error Types ===
pub use error::{PivotError, Result};

// === Classification ===
pub use classify::{ColumnClassification, VariableRole, classify_columns, pivot_variables};

// === Domain Analysis ===
pub use domain::{
    DomainAnalysis, continuity_warning, count_negative_map, median, normalized_by_median_map,
};

// === Grouping ===
pub use grouping::{GroupAssignment, GroupMap, common_start};

// === Engine ===
pub use engine::{
    DEFAULT_WEIGHT, NoopObserver, PivotBlock, PivotInput, PivotObserver, PivotOutcome,
    classify_survey, label_answers, pivot_questions, run_pivot,
};
pub use source::{QuestionSource, SurveySource};

// === Output ===
pub use assemble::{AssembledOutput, assemble_output};
pub use frame::pivoted_frame;
