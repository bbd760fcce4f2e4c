use std::io::{self, IsTerminal};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use survey_cli::config::SurveyConfig;
use survey_cli::pipeline::{RunOptions, inspect, run_pipeline};

use crate::cli::{InspectArgs, RunArgs};
use crate::progress::ProgressObserver;
use crate::summary::print_inspection;
use crate::types::RunResult;

pub fn run_survey(args: &RunArgs) -> Result<RunResult> {
    let config = SurveyConfig::load(&args.config)?;
    let options = RunOptions {
        output: args.output.clone(),
        format: args.format.map(Into::into),
        dry_run: args.dry_run,
    };
    let mut progress = ProgressObserver::new(!args.no_progress && io::stderr().is_terminal());

    let start = Instant::now();
    let report = run_pipeline(&config, &options, &mut progress)?;
    info!(
        survey = %config.survey_name,
        rows = report.outcome.table.len(),
        warnings = report.warnings.len(),
        duration_ms = start.elapsed().as_millis(),
        "survey pivoted"
    );

    Ok(RunResult {
        survey_name: config.survey_name,
        year: config.year,
        output_path: report.output_path,
        output_format: report.output_format,
        written: report.written,
        respondents: report.outcome.respondents,
        attributes: report.outcome.classification.attributes.len(),
        questions: report.outcome.classification.questions.len(),
        groups: report.outcome.groups,
        rows: report.outcome.table.len(),
        dropped_rows: report.outcome.dropped_rows,
        warnings: report.warnings,
    })
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let config = SurveyConfig::load(&args.config)?;
    let span = info_span!("inspect", survey = %config.survey_name, year = %config.year);
    let summaries = span.in_scope(|| inspect(&config))?;
    if args.json {
        let json = serde_json::to_string_pretty(&summaries).context("serialize classification")?;
        println!("{json}");
    } else {
        print_inspection(&summaries);
    }
    Ok(())
}
