//! End-to-end tests for the staged pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use survey_cli::config::SurveyConfig;
use survey_cli::pipeline::{RunOptions, inspect, run_pipeline};
use survey_model::{OutputFormat, PivotWarning};
use survey_pivot::{NoopObserver, VariableRole};
use tempfile::TempDir;

const NAMES: &str = "Name,Label
Region,Region of residence
Age,Age in years
Q1_a,Trust in institutions: police
Q1_b,Trust in institutions: courts
Q2,Overall satisfaction
";

const VALUES: &str = "Question,Value,Label
Q1_a,1,None
,2,Some
,3,A lot
,4,Don't know
Q1_b,1,None
,2,Some
,3,A lot
,4,Don't know
Q2,1,Low
,2,Medium
,3,High
";

const CONFIG: &str = "\
year: 2024
survey_name: Civic Survey
weight_col: wt
input_filename_with_values: survey.csv
input_filename_value_label_map: unused.xlsx
both_attribute_and_question: [Region]
columns_to_ignore: [RespondentId]
exclude_from_analysis: [\"Don't know\"]
common_string_threshold: 5
variable_labels_file: names.csv
value_labels_file: values.csv
";

/// Survey table in ISO-8859-1, the default input encoding.
fn survey_bytes(q2_second: &str) -> Vec<u8> {
    let mut bytes = b"RespondentId,Region,Age,Q1_a,Q1_b,Q2,wt\n1,North,34,1,2,3,0.5\n2,Z".to_vec();
    bytes.push(0xFC);
    bytes.extend_from_slice(format!("rich,51,4,,{q2_second},1.5\n").as_bytes());
    bytes
}

fn write_fixture(dir: &TempDir, values: &str, q2_second: &str) -> PathBuf {
    fs::write(dir.path().join("survey.csv"), survey_bytes(q2_second)).unwrap();
    fs::write(dir.path().join("names.csv"), NAMES).unwrap();
    fs::write(dir.path().join("values.csv"), values).unwrap();
    let config = dir.path().join("config.yml");
    fs::write(&config, CONFIG).unwrap();
    config
}

fn load(path: &Path) -> SurveyConfig {
    SurveyConfig::load(path).unwrap()
}

#[test]
fn test_run_writes_sorted_csv() {
    let dir = TempDir::new().unwrap();
    let config = load(&write_fixture(&dir, VALUES, "1"));

    let report = run_pipeline(&config, &RunOptions::default(), &mut NoopObserver).unwrap();

    assert!(report.written);
    assert_eq!(
        report.output_path,
        dir.path().join("2024_civic_survey_pivoted.csv")
    );
    assert_eq!(report.outcome.respondents, 2);
    assert_eq!(report.outcome.dropped_rows, 1);
    assert_eq!(report.outcome.table.len(), 7);
    assert_eq!(report.outcome.groups, 3);
    assert!(report.warnings.contains(&PivotWarning::MissingLabel {
        variable: "wt".to_string()
    }));

    let text = fs::read_to_string(&report.output_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(
        lines[0],
        "survey_name,year,Region of residence,Age in years,wt,question_group_varname,\
         question_group_text,question_varname,question_text,answer_value,answer_text,\
         count_negative,normalized_by_median,weight"
    );
    assert!(lines[1].starts_with(
        "Civic Survey,2024,North,34,0.5,Q1,Trust in institutions: ,Q1_a,\
         Trust in institutions: police,1,None,"
    ));
    assert!(lines[1].ends_with(",0.5"));

    let question_order: Vec<&str> = lines[1..]
        .iter()
        .map(|line| line.split(',').nth(7).unwrap())
        .collect();
    assert_eq!(
        question_order,
        vec![
            "Q1_a",
            "Q1_a",
            "Q1_b",
            "Q2",
            "Q2",
            "Region of residence",
            "Region of residence"
        ]
    );
    assert!(text.contains("Zürich"));
}

#[test]
fn test_survey_without_respondents_writes_header() {
    let dir = TempDir::new().unwrap();
    let config = load(&write_fixture(&dir, VALUES, "1"));
    fs::write(&config.input_file, "RespondentId,Region,Age,Q1_a,Q1_b,Q2,wt\n").unwrap();

    let report = run_pipeline(&config, &RunOptions::default(), &mut NoopObserver).unwrap();

    assert!(report.written);
    assert_eq!(report.outcome.respondents, 0);
    assert!(report.outcome.table.rows.is_empty());
    let text = fs::read_to_string(&report.output_path).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("survey_name,year,Region of residence,Age in years,wt,"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = load(&write_fixture(&dir, VALUES, "1"));
    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };

    let report = run_pipeline(&config, &options, &mut NoopObserver).unwrap();

    assert!(!report.written);
    assert_eq!(report.outcome.table.len(), 7);
    assert!(!report.output_path.exists());
}

#[test]
fn test_format_override_writes_xlsx() {
    let dir = TempDir::new().unwrap();
    let config = load(&write_fixture(&dir, VALUES, "1"));
    let options = RunOptions {
        format: Some(OutputFormat::Xlsx),
        ..RunOptions::default()
    };

    let report = run_pipeline(&config, &options, &mut NoopObserver).unwrap();

    assert_eq!(report.output_format, OutputFormat::Xlsx);
    assert_eq!(
        report.output_path,
        dir.path().join("2024_civic_survey_pivoted.xlsx")
    );
    assert!(report.output_path.exists());
}

#[test]
fn test_duplicate_code_is_fatal() {
    let dir = TempDir::new().unwrap();
    let values = format!("{VALUES},3,Very high\n");
    let config = load(&write_fixture(&dir, &values, "1"));

    let error = run_pipeline(&config, &RunOptions::default(), &mut NoopObserver).unwrap_err();

    assert!(format!("{error:#}").contains("duplicate answer code 3 for question 'Q2'"));
    assert!(!config.output_file.exists());
}

#[test]
fn test_missing_mapping_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = load(&write_fixture(&dir, VALUES, "7"));

    let error = run_pipeline(&config, &RunOptions::default(), &mut NoopObserver).unwrap_err();

    assert!(format!("{error:#}").contains("value '7' of variable 'Q2' has no label"));
    assert!(!config.output_file.exists());
}

#[test]
fn test_missing_config_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, CONFIG.replace("weight_col: wt\n", "")).unwrap();

    let error = SurveyConfig::load(&path).unwrap_err();

    assert_eq!(
        error.to_string(),
        format!(
            "expected key 'weight_col' in config file {} but it wasn't found",
            path.display()
        )
    );
}

#[test]
fn test_inspect_reports_roles() {
    let dir = TempDir::new().unwrap();
    let config = load(&write_fixture(&dir, VALUES, "1"));

    let summaries = inspect(&config).unwrap();

    let names: Vec<&str> = summaries.iter().map(|s| s.variable.as_str()).collect();
    assert_eq!(names, vec!["Region", "Age", "Q1_a", "Q1_b", "Q2", "wt"]);
    assert_eq!(summaries[0].role, VariableRole::AttributeAndQuestion);
    assert_eq!(summaries[0].display_name, "Region of residence");
    assert_eq!(summaries[1].role, VariableRole::Attribute);
    assert_eq!(summaries[2].role, VariableRole::Question);
    assert_eq!(summaries[2].domain_size, Some(4));
    assert_eq!(summaries[5].label, "wt");
    assert_eq!(summaries[5].domain_size, None);
}

#[test]
fn test_metadata_workbook() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("survey.csv"), survey_bytes("2")).unwrap();

    let mut workbook = Workbook::new();
    let values = workbook.add_worksheet();
    for (col, header) in ["Question", "Value", "Label"].iter().enumerate() {
        values.write_string(0, col as u16, *header).unwrap();
    }
    let codes = [("Q1_a", 4), ("Q1_b", 4), ("Q2", 3)];
    let mut row = 1;
    for (question, count) in codes {
        values.write_string(row, 0, question).unwrap();
        for code in 1..=count {
            values.write_number(row, 1, f64::from(code)).unwrap();
            values.write_string(row, 2, format!("Label {code}")).unwrap();
            row += 1;
        }
    }
    let names = workbook.add_worksheet();
    for (idx, line) in NAMES.lines().enumerate() {
        let (name, label) = line.split_once(',').unwrap();
        names.write_string(idx as u32, 0, name).unwrap();
        names.write_string(idx as u32, 1, label).unwrap();
    }
    workbook.save(dir.path().join("labels.xlsx")).unwrap();

    let config_text = CONFIG
        .replace("unused.xlsx", "labels.xlsx")
        .replace("variable_labels_file: names.csv\nvalue_labels_file: values.csv\n", "");
    let path = dir.path().join("config.yml");
    fs::write(&path, config_text).unwrap();

    let report =
        run_pipeline(&load(&path), &RunOptions::default(), &mut NoopObserver).unwrap();

    let text = fs::read_to_string(&report.output_path).unwrap();
    assert!(text.contains(",Q2,Overall satisfaction,2,Label 2,"));
    assert_eq!(report.outcome.table.len(), 7);
}
