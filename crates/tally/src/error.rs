// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use thiserror::Error;
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Column classification error: {0}")]
    Classification(#[from] ClassificationError),
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] SerialisationError),
}
/// Failures to find a column for a required role. Fatal for the chart or
/// summary call that raised them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("No numeric column found")]
    NoNumericColumn,
    #[error("No valid categorical column found")]
    NoCategoricalColumn,
    #[error("No time column found with a date parse ratio above {threshold:.2}")]
    NoTimeColumn { threshold: f64 },
    #[error("No valid time column found")]
    NoValidTimeColumn,
}
/// Produced inside the query engine only. Never surfaces as an `Err` to
/// callers: its display form is the answer sentence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error(
        "The dataset does not contain a '{concept}'-related column. Available columns are: {}.",
        .available.join(", ")
    )]
    SchemaConceptMissing {
        concept: String,
        available: Vec<String>,
    },
}
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read data file '{path}': {source}")]
    DataFileError {
        path: String,
        #[source]
        source: polars::error::PolarsError,
    },
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },
    #[error("Unsupported data format: {format}")]
    UnsupportedFormat { format: String },
}
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML configuration: {source}")]
    YamlParseError {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Invalid threshold: {field} = {value} (expected a ratio between 0 and 1)")]
    InvalidThreshold { field: String, value: f64 },
    #[error("Invalid top-N value: {value}")]
    InvalidTopN { value: usize },
    #[error("Unsupported chart type: '{chart}'")]
    UnsupportedChartType { chart: String },
}
#[derive(Error, Debug)]
pub enum SerialisationError {
    #[error("JSON serialisation failed: {source}")]
    JsonSerialisationError {
        #[from]
        source: serde_json::Error,
    },
}
pub type Result<T> = std::result::Result<T, AnalyticsError>;
pub type ClassificationResult<T> = std::result::Result<T, ClassificationError>;
pub type DataResult<T> = std::result::Result<T, DataError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        AnalyticsError::Serialisation(SerialisationError::JsonSerialisationError { source: err })
    }
}
impl From<polars::error::PolarsError> for AnalyticsError {
    fn from(err: polars::error::PolarsError) -> Self {
        AnalyticsError::Data(DataError::Polars(err))
    }
}
impl AnalyticsError {
    /// Errors caused by the shape of the dataset rather than by the
    /// environment. Another dataset or chart kind may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalyticsError::Classification(_)
                | AnalyticsError::Config(ConfigError::UnsupportedChartType { .. })
        )
    }
    pub fn category(&self) -> &'static str {
        match self {
            AnalyticsError::Classification(_) => "Classification",
            AnalyticsError::Data(_) => "Data",
            AnalyticsError::Config(_) => "Configuration",
            AnalyticsError::Io(_) => "I/O",
            AnalyticsError::Serialisation(_) => "Serialisation",
        }
    }
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            AnalyticsError::Classification(ClassificationError::NoNumericColumn) => vec![
                "Make sure at least one column holds numbers only".to_string(),
                "Remove currency symbols or thousands separators before loading".to_string(),
            ],
            AnalyticsError::Classification(ClassificationError::NoCategoricalColumn) => vec![
                "Add a text column to group by (region, category, product...)".to_string(),
                "Columns that are mostly dates are not used for grouping".to_string(),
            ],
            AnalyticsError::Classification(ClassificationError::NoTimeColumn { .. })
            | AnalyticsError::Classification(ClassificationError::NoValidTimeColumn) => vec![
                "Add a date column with values such as 2024-01-31".to_string(),
                "Check that most rows of the date column are filled in".to_string(),
            ],
            AnalyticsError::Data(DataError::UnsupportedFormat { .. }) => vec![
                "Use a .csv, .parquet or .json file".to_string(),
            ],
            AnalyticsError::Config(ConfigError::UnsupportedChartType { .. }) => vec![
                "Supported chart types are bar, line and pie".to_string(),
            ],
            _ => vec!["Check the error message for specific guidance".to_string()],
        }
    }
    pub fn user_message(&self) -> String {
        match self {
            AnalyticsError::Classification(ClassificationError::NoNumericColumn) => {
                "The dataset has no numeric column to aggregate.".to_string()
            }
            AnalyticsError::Classification(ClassificationError::NoTimeColumn { .. })
            | AnalyticsError::Classification(ClassificationError::NoValidTimeColumn) => {
                "The dataset has no column that looks like dates.".to_string()
            }
            AnalyticsError::Data(DataError::DataFileError { path, .. }) => {
                format!("Unable to read the dataset at '{path}'.")
            }
            _ => self.to_string(),
        }
    }
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AnalyticsError::Classification(_) => ErrorSeverity::Warning,
            AnalyticsError::Config(ConfigError::UnsupportedChartType { .. }) => {
                ErrorSeverity::Warning
            }
            AnalyticsError::Config(_) => ErrorSeverity::Error,
            AnalyticsError::Data(DataError::DataFileError { .. }) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}
impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "INFO",
            ErrorSeverity::Warning => "WARNING",
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
    pub fn color_code(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "\x1b[36m",
            ErrorSeverity::Warning => "\x1b[33m",
            ErrorSeverity::Error => "\x1b[31m",
            ErrorSeverity::Critical => "\x1b[35m",
        }
    }
}
pub struct ErrorReporter {
    pub show_suggestions: bool,
    pub colored_output: bool,
}
impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            show_suggestions: true,
            colored_output: true,
        }
    }
    pub fn plain() -> Self {
        Self {
            show_suggestions: true,
            colored_output: false,
        }
    }
    pub fn report(&self, error: &AnalyticsError) -> String {
        let severity = error.severity();
        let mut output = String::new();
        if self.colored_output {
            output.push_str(severity.color_code());
        }
        output.push_str(&format!(
            "[{}] {}: {}\n",
            severity.as_str(),
            error.category(),
            error.user_message()
        ));
        if self.colored_output {
            output.push_str("\x1b[0m");
        }
        if self.show_suggestions {
            let suggestions = error.suggestions();
            if !suggestions.is_empty() {
                output.push_str("\nSuggestions:\n");
                for suggestion in suggestions {
                    output.push_str(&format!("  • {suggestion}\n"));
                }
            }
        }
        output
    }
}
impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
