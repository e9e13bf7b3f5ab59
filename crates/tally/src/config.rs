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

use crate::error::{ConfigError, ConfigResult};
use crate::query::intent::{default_rules, IntentRule};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub classifier: ClassifierConfig,
    pub charts: ChartConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Non-numeric columns whose date parse ratio exceeds this are not
    /// used as grouping dimensions.
    pub group_date_ratio: f64,
    /// Parse ratio a column must exceed to serve as the time axis.
    pub time_ratio: f64,
    pub temporal_formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub bar_top_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub value_priority: Vec<String>,
    pub time_markers: Vec<String>,
    pub schema_concepts: Vec<SchemaConcept>,
    pub rules: Vec<IntentRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConcept {
    pub name: String,
    pub synonyms: Vec<String>,
}

impl SchemaConcept {
    pub fn new(name: &str, synonyms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            group_date_ratio: 0.5,
            time_ratio: 0.8,
            temporal_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M:%S%.f".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S%.f".to_string(),
                "%Y-%m-%dT%H:%M:%SZ".to_string(),
                "%Y/%m/%d".to_string(),
                "%m/%d/%Y".to_string(),
                "%d/%m/%Y".to_string(),
                "%d-%m-%Y".to_string(),
                "%d.%m.%Y".to_string(),
                "%Y%m%d".to_string(),
                "%b %d, %Y".to_string(),
                "%B %d, %Y".to_string(),
                "%d %b %Y".to_string(),
                "%d %B %Y".to_string(),
            ],
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { bar_top_n: 5 }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            value_priority: vec![
                "sales".to_string(),
                "profit".to_string(),
                "revenue".to_string(),
            ],
            time_markers: vec!["date".to_string(), "year".to_string()],
            schema_concepts: vec![
                SchemaConcept::new("region", &["region", "state", "area", "zone"]),
                SchemaConcept::new("category", &["category", "segment", "department", "type"]),
            ],
            rules: default_rules(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("classifier.group_date_ratio", self.classifier.group_date_ratio),
            ("classifier.time_ratio", self.classifier.time_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }
        if self.charts.bar_top_n == 0 {
            return Err(ConfigError::InvalidTopN {
                value: self.charts.bar_top_n,
            });
        }
        Ok(())
    }

    /// Only columns that are almost entirely dates count as a time axis.
    pub fn strict() -> Self {
        Self {
            classifier: ClassifierConfig {
                time_ratio: 0.9,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn lenient() -> Self {
        Self {
            classifier: ClassifierConfig {
                time_ratio: 0.6,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
