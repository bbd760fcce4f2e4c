//! Survey configuration loaded from a YAML file.
//!
//! Required keys mirror the settings of one survey run; a missing key aborts
//! before any data is read. Relative paths resolve against the directory of
//! the config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_yaml::Value;

use survey_ingest::{DEFAULT_SURVEY_ENCODING, MetadataSource};
use survey_model::{OutputFormat, PivotSettings};
use survey_output::default_output_filename;

/// Keys that must appear in every config file.
pub const REQUIRED_KEYS: [&str; 9] = [
    "year",
    "survey_name",
    "weight_col",
    "input_filename_with_values",
    "input_filename_value_label_map",
    "both_attribute_and_question",
    "columns_to_ignore",
    "exclude_from_analysis",
    "common_string_threshold",
];

const DEFAULT_QUESTION_PREFIX: &str = "Q";

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(deserialize_with = "scalar_text")]
    year: String,
    #[serde(deserialize_with = "scalar_text")]
    survey_name: String,
    #[serde(default, deserialize_with = "optional_text")]
    weight_col: Option<String>,
    input_filename_with_values: PathBuf,
    input_filename_value_label_map: PathBuf,
    #[serde(deserialize_with = "text_list")]
    both_attribute_and_question: Vec<String>,
    #[serde(deserialize_with = "text_list")]
    columns_to_ignore: Vec<String>,
    #[serde(deserialize_with = "text_list")]
    exclude_from_analysis: Vec<String>,
    common_string_threshold: usize,
    #[serde(default)]
    question_prefix: Option<String>,
    #[serde(default)]
    input_encoding: Option<String>,
    #[serde(default)]
    output_filename: Option<PathBuf>,
    #[serde(default)]
    output_format: Option<OutputFormat>,
    #[serde(default)]
    variable_labels_file: Option<PathBuf>,
    #[serde(default)]
    value_labels_file: Option<PathBuf>,
}

/// A fully resolved survey configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyConfig {
    /// The file this configuration was read from.
    pub path: PathBuf,
    pub survey_name: String,
    pub year: String,
    pub weight_column: Option<String>,
    /// The wide survey table.
    pub input_file: PathBuf,
    pub input_encoding: String,
    pub metadata: MetadataSource,
    pub dual_role_columns: Vec<String>,
    pub ignore_columns: Vec<String>,
    pub exclude_from_analysis: Vec<String>,
    pub common_prefix_threshold: usize,
    pub question_prefix: String,
    pub output_file: PathBuf,
    pub output_format: OutputFormat,
}

impl SurveyConfig {
    /// Reads and resolves the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::parse(&text, path)
    }

    /// Resolves configuration text as if it were read from `path`.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)
            .with_context(|| format!("parse config file {}", path.display()))?;
        if !value.is_mapping() {
            bail!("config file {} must map keys to values", path.display());
        }
        for key in REQUIRED_KEYS {
            if value.get(key).is_none() {
                bail!(
                    "expected key '{key}' in config file {} but it wasn't found",
                    path.display()
                );
            }
        }
        let raw: RawConfig = serde_yaml::from_value(value)
            .with_context(|| format!("invalid value in config file {}", path.display()))?;

        let base = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let resolve = |file: &Path| base.join(file);

        let metadata = match (&raw.variable_labels_file, &raw.value_labels_file) {
            (Some(variable_labels), Some(value_labels)) => MetadataSource::CsvFiles {
                variable_labels: resolve(variable_labels),
                value_labels: resolve(value_labels),
            },
            (None, None) => MetadataSource::Workbook(resolve(&raw.input_filename_value_label_map)),
            _ => bail!(
                "config file {} must set both variable_labels_file and value_labels_file, or neither",
                path.display()
            ),
        };

        let output_format = raw
            .output_format
            .or_else(|| {
                raw.output_filename
                    .as_deref()
                    .and_then(OutputFormat::from_path)
            })
            .unwrap_or_default();
        let output_file = match &raw.output_filename {
            Some(file) => resolve(file),
            None => resolve(Path::new(&default_output_filename(
                &raw.year,
                &raw.survey_name,
                output_format,
            ))),
        };

        Ok(Self {
            path: path.to_path_buf(),
            weight_column: raw.weight_col.filter(|column| !column.trim().is_empty()),
            input_file: resolve(&raw.input_filename_with_values),
            input_encoding: raw
                .input_encoding
                .unwrap_or_else(|| DEFAULT_SURVEY_ENCODING.to_string()),
            metadata,
            dual_role_columns: raw.both_attribute_and_question,
            ignore_columns: raw.columns_to_ignore,
            exclude_from_analysis: raw.exclude_from_analysis,
            common_prefix_threshold: raw.common_string_threshold,
            question_prefix: raw
                .question_prefix
                .unwrap_or_else(|| DEFAULT_QUESTION_PREFIX.to_string()),
            output_file,
            output_format,
            survey_name: raw.survey_name,
            year: raw.year,
        })
    }

    /// Settings handed to the pivot engine.
    pub fn to_settings(&self) -> PivotSettings {
        PivotSettings::new(self.survey_name.clone(), self.year.clone())
            .with_weight_column(self.weight_column.clone())
            .with_ignore_columns(self.ignore_columns.clone())
            .with_dual_role_columns(self.dual_role_columns.clone())
            .with_exclude_from_analysis(self.exclude_from_analysis.clone())
            .with_common_prefix_threshold(self.common_prefix_threshold)
            .with_question_prefix(self.question_prefix.clone())
    }

    /// Output path and format after command-line overrides.
    ///
    /// An explicit format wins; otherwise the override path's extension
    /// decides, then the configured format. Overriding only the format keeps
    /// the configured file name with a matching extension.
    pub fn resolve_output(
        &self,
        output: Option<&Path>,
        format: Option<OutputFormat>,
    ) -> (PathBuf, OutputFormat) {
        let format = format
            .or_else(|| output.and_then(OutputFormat::from_path))
            .unwrap_or(self.output_format);
        let path = match output {
            Some(path) => path.to_path_buf(),
            None if format != self.output_format => {
                self.output_file.with_extension(format.extension())
            }
            None => self.output_file.clone(),
        };
        (path, format)
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    value_text(&value).ok_or_else(|| de::Error::custom("expected a string or number"))
}

fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => value_text(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom("expected a string, number or nothing")),
    }
}

// An empty YAML list is often written as a bare key, which reads as null.
fn text_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    Option::<Vec<Value>>::deserialize(deserializer)?
        .unwrap_or_default()
        .iter()
        .map(|value| value_text(value).ok_or_else(|| de::Error::custom("expected a list of strings")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "\
year: 2024
survey_name: Civic Survey
weight_col: wt
input_filename_with_values: data/civic.csv
input_filename_value_label_map: data/civic_labels.xlsx
both_attribute_and_question: [Region]
columns_to_ignore:
  - RespondentId
exclude_from_analysis: [\"Don't know\", Refused]
common_string_threshold: 10
";

    fn parse(text: &str) -> Result<SurveyConfig> {
        SurveyConfig::parse(text, Path::new("/surveys/civic/config.yml"))
    }

    #[test]
    fn test_parse_required_keys() {
        let config = parse(BASE).unwrap();
        assert_eq!(config.year, "2024");
        assert_eq!(config.survey_name, "Civic Survey");
        assert_eq!(config.weight_column.as_deref(), Some("wt"));
        assert_eq!(config.input_file, PathBuf::from("/surveys/civic/data/civic.csv"));
        assert_eq!(
            config.metadata,
            MetadataSource::Workbook(PathBuf::from("/surveys/civic/data/civic_labels.xlsx"))
        );
        assert_eq!(config.dual_role_columns, vec!["Region"]);
        assert_eq!(config.ignore_columns, vec!["RespondentId"]);
        assert_eq!(config.exclude_from_analysis, vec!["Don't know", "Refused"]);
        assert_eq!(config.common_prefix_threshold, 10);
        assert_eq!(config.question_prefix, "Q");
        assert_eq!(config.input_encoding, "iso-8859-1");
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(
            config.output_file,
            PathBuf::from("/surveys/civic/2024_civic_survey_pivoted.csv")
        );
    }

    #[test]
    fn test_missing_key_message() {
        let text = BASE.replace("common_string_threshold: 10\n", "");
        let error = parse(&text).unwrap_err();
        assert_eq!(
            error.to_string(),
            "expected key 'common_string_threshold' in config file /surveys/civic/config.yml but it wasn't found"
        );
    }

    #[test]
    fn test_blank_values() {
        let text = BASE
            .replace("weight_col: wt", "weight_col:")
            .replace("both_attribute_and_question: [Region]", "both_attribute_and_question:")
            .replace("year: 2024", "year: \"2024/25\"");
        let config = parse(&text).unwrap();
        assert_eq!(config.weight_column, None);
        assert!(config.dual_role_columns.is_empty());
        assert_eq!(config.year, "2024/25");
    }

    #[test]
    fn test_optional_keys() {
        let text = format!(
            "{BASE}question_prefix: V\ninput_encoding: utf-8\noutput_filename: out/civic.xlsx\n\
             variable_labels_file: names.csv\nvalue_labels_file: /abs/values.csv\n"
        );
        let config = parse(&text).unwrap();
        assert_eq!(config.question_prefix, "V");
        assert_eq!(config.input_encoding, "utf-8");
        assert_eq!(config.output_format, OutputFormat::Xlsx);
        assert_eq!(config.output_file, PathBuf::from("/surveys/civic/out/civic.xlsx"));
        assert_eq!(
            config.metadata,
            MetadataSource::CsvFiles {
                variable_labels: PathBuf::from("/surveys/civic/names.csv"),
                value_labels: PathBuf::from("/abs/values.csv"),
            }
        );
    }

    #[test]
    fn test_half_csv_metadata_rejected() {
        let text = format!("{BASE}value_labels_file: values.csv\n");
        let error = parse(&text).unwrap_err();
        assert!(error.to_string().contains("variable_labels_file"));
    }

    #[test]
    fn test_resolve_output_overrides() {
        let config = parse(BASE).unwrap();

        let (path, format) = config.resolve_output(None, None);
        assert_eq!(path, config.output_file);
        assert_eq!(format, OutputFormat::Csv);

        let (path, format) = config.resolve_output(None, Some(OutputFormat::Xlsx));
        assert_eq!(
            path,
            PathBuf::from("/surveys/civic/2024_civic_survey_pivoted.xlsx")
        );
        assert_eq!(format, OutputFormat::Xlsx);

        let (path, format) = config.resolve_output(Some(Path::new("long.xlsx")), None);
        assert_eq!(path, PathBuf::from("long.xlsx"));
        assert_eq!(format, OutputFormat::Xlsx);
    }

    #[test]
    fn test_to_settings() {
        let settings = parse(BASE).unwrap().to_settings();
        assert_eq!(settings.survey_name, "Civic Survey");
        assert_eq!(settings.weight_column.as_deref(), Some("wt"));
        assert!(settings.is_dual_role("Region"));
        assert!(settings.is_ignored("RespondentId"));
        assert!(settings.is_excluded_label("refused"));
        assert_eq!(settings.common_prefix_threshold, 10);
    }
}
