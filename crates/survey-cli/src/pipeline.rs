//! Survey pivot pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read the wide table, then the label and value-domain metadata
//! 2. **Pivot**: classify columns and turn every question into long rows
//! 3. **Output**: write the sorted rows as CSV or Excel
//!
//! Every stage runs in its own span and logs its duration. Pending
//! diagnostics are flushed at the end of each stage, and a fatal error in
//! any stage stops the run before anything is written.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{debug, info, info_span};

use survey_ingest::{SurveyMetadata, load_survey_metadata, read_csv_table, table_column_names};
use survey_model::{
    Checkpoint, Diagnostics, OutputFormat, PivotSettings, PivotWarning, PivotedTable, ValueDomain,
};
use survey_output::write_pivoted;
use survey_pivot::{
    PivotInput, PivotObserver, PivotOutcome, VariableRole, classify_survey, pivot_variables,
    run_pivot,
};

use crate::config::SurveyConfig;

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    /// The wide survey table, every column as text.
    pub table: DataFrame,
    pub metadata: SurveyMetadata,
}

/// Reads the survey table and the metadata for its pivot variables.
pub fn ingest(
    config: &SurveyConfig,
    settings: &PivotSettings,
    diagnostics: &mut Diagnostics,
) -> Result<IngestResult> {
    let table = read_csv_table(&config.input_file, &config.input_encoding)
        .with_context(|| format!("read survey table {}", config.input_file.display()))?;
    let variables = pivot_variables(&table_column_names(&table), settings);
    let metadata = load_survey_metadata(&config.metadata, &variables, diagnostics)
        .with_context(|| format!("load metadata {}", config.metadata.display_path().display()))?;
    diagnostics.flush(Checkpoint::MetadataLoaded);

    for (variable, domain) in metadata.domains.iter() {
        debug!(variable, codes = domain.len(), "Value domain");
    }
    info!(
        respondents = table.height(),
        columns = table.width(),
        labels = metadata.labels.len(),
        domains = metadata.domains.len(),
        "Loaded survey"
    );
    Ok(IngestResult { table, metadata })
}

// ============================================================================
// Stage 2: Pivot
// ============================================================================

/// Classifies, pivots and assembles the ingested survey.
pub fn pivot(
    ingested: &IngestResult,
    settings: &PivotSettings,
    observer: &mut dyn PivotObserver,
    diagnostics: &mut Diagnostics,
) -> Result<PivotOutcome> {
    let input = PivotInput {
        source: &ingested.table,
        labels: &ingested.metadata.labels,
        domains: &ingested.metadata.domains,
        settings,
    };
    let outcome = run_pivot(&input, observer, diagnostics).context("pivot survey")?;
    Ok(outcome)
}

// ============================================================================
// Stage 3: Output
// ============================================================================

/// Writes the pivoted rows.
pub fn output(table: &PivotedTable, path: &Path, format: OutputFormat) -> Result<PathBuf> {
    write_pivoted(table, path, format)
        .with_context(|| format!("write pivoted output {}", path.display()))
}

// ============================================================================
// Full run
// ============================================================================

/// Command-line choices applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    /// Run every stage but skip writing.
    pub dry_run: bool,
}

/// What a full run produced.
#[derive(Debug)]
pub struct PipelineReport {
    pub outcome: PivotOutcome,
    /// Target path, written unless this was a dry run.
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub written: bool,
    pub warnings: Vec<PivotWarning>,
}

/// Runs ingest, pivot and output for one survey.
pub fn run_pipeline(
    config: &SurveyConfig,
    options: &RunOptions,
    observer: &mut dyn PivotObserver,
) -> Result<PipelineReport> {
    let run_span = info_span!("pivot_run", survey = %config.survey_name, year = %config.year);
    let _run_guard = run_span.enter();
    let settings = config.to_settings();
    let mut diagnostics = Diagnostics::new();

    let ingest_start = Instant::now();
    let ingested = info_span!("ingest", input = %config.input_file.display())
        .in_scope(|| ingest(config, &settings, &mut diagnostics))?;
    info!(
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let pivot_start = Instant::now();
    let outcome = info_span!("pivot")
        .in_scope(|| pivot(&ingested, &settings, observer, &mut diagnostics))?;
    info!(
        rows = outcome.table.len(),
        dropped_rows = outcome.dropped_rows,
        duration_ms = pivot_start.elapsed().as_millis(),
        "pivot complete"
    );

    let (output_path, output_format) =
        config.resolve_output(options.output.as_deref(), options.format);
    let written = if options.dry_run {
        info!(path = %output_path.display(), "dry run, output not written");
        false
    } else {
        let output_start = Instant::now();
        info_span!("output", path = %output_path.display())
            .in_scope(|| output(&outcome.table, &output_path, output_format))?;
        info!(
            duration_ms = output_start.elapsed().as_millis(),
            "output complete"
        );
        true
    };

    Ok(PipelineReport {
        outcome,
        output_path,
        output_format,
        written,
        warnings: diagnostics.into_warnings(),
    })
}

// ============================================================================
// Inspection
// ============================================================================

/// How one survey variable would be pivoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableSummary {
    pub variable: String,
    pub role: VariableRole,
    /// Attribute column name or question identifier.
    pub display_name: String,
    pub label: String,
    /// Number of labelled codes, when the variable has a value domain.
    pub domain_size: Option<usize>,
}

/// Classifies the survey without pivoting it.
pub fn inspect(config: &SurveyConfig) -> Result<Vec<VariableSummary>> {
    let settings = config.to_settings();
    let mut diagnostics = Diagnostics::new();
    let ingested = ingest(config, &settings, &mut diagnostics)?;
    let labels = &ingested.metadata.labels;
    let classification = classify_survey(&ingested.table, labels, &settings);

    let variables = pivot_variables(&table_column_names(&ingested.table), &settings);
    let summaries = variables
        .into_iter()
        .map(|variable| {
            let display_name = classification
                .display_name(&variable)
                .unwrap_or(&variable)
                .to_string();
            VariableSummary {
                role: classification.role(&variable),
                label: labels.label_or_name(&variable).to_string(),
                domain_size: ingested.metadata.domains.get(&variable).map(ValueDomain::len),
                display_name,
                variable,
            }
        })
        .collect();
    Ok(summaries)
}
