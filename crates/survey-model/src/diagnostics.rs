//! Non-fatal warnings raised during a pivot run.
//!
//! Stages push warnings as they find them. The run flushes the collector at
//! fixed checkpoints, which logs the pending warnings in checkpoint order and
//! keeps them for the final summary.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A condition worth reporting that does not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum PivotWarning {
    #[error("no label found for variable '{variable}', using the variable name")]
    MissingLabel { variable: String },

    #[error("attribute column '{column}' not found in the survey table, its cells stay empty")]
    AttributeColumnMissing { column: String },

    #[error("weight column '{column}' not found in the survey table, every weight is 1")]
    WeightColumnMissing { column: String },

    #[error("question '{question}' has a non-positive answer code {code}")]
    NonPositiveCode { question: String, code: i64 },

    #[error("question '{question}' answer codes jump from {previous} to {next}")]
    DomainDiscontinuity {
        question: String,
        previous: i64,
        next: i64,
    },
}

/// Points in the run where pending warnings are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    MetadataLoaded,
    ColumnsClassified,
    Pivoted,
}

impl Checkpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Checkpoint::MetadataLoaded => "metadata",
            Checkpoint::ColumnsClassified => "classification",
            Checkpoint::Pivoted => "pivot",
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warning collector shared by every stage of a run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    pending: Vec<PivotWarning>,
    flushed: Vec<PivotWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: PivotWarning) {
        self.pending.push(warning);
    }

    /// Logs every pending warning and moves it to the flushed history.
    /// Returns how many warnings were flushed.
    pub fn flush(&mut self, checkpoint: Checkpoint) -> usize {
        let count = self.pending.len();
        for warning in self.pending.drain(..) {
            tracing::warn!(checkpoint = %checkpoint, "{warning}");
            self.flushed.push(warning);
        }
        count
    }

    pub fn pending(&self) -> &[PivotWarning] {
        &self.pending
    }

    /// Warnings already flushed, in flush order.
    pub fn warnings(&self) -> &[PivotWarning] {
        &self.flushed
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.flushed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the collector, returning flushed warnings followed by any
    /// still pending.
    pub fn into_warnings(mut self) -> Vec<PivotWarning> {
        self.flushed.append(&mut self.pending);
        self.flushed
    }
}
