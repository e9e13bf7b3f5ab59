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

use crate::aggregate::{group_sum, group_sum_by_month, percent_of_total, Aggregation};
use crate::classifier::ColumnClassifier;
use crate::config::ChartConfig;
use crate::error::{ConfigError, Result};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ConfigError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            _ => Err(ConfigError::UnsupportedChartType {
                chart: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    pub chart_type: ChartKind,
    pub meta: ChartMeta,
    pub data: Vec<ChartPoint>,
}

/// Column names used for each role of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartMeta {
    Grouped {
        #[serde(rename = "groupBy")]
        group_by: String,
        value: String,
    },
    Temporal {
        time: String,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartPoint {
    Labelled { label: String, value: f64 },
    Timed { x: String, y: f64 },
}

impl ChartPoint {
    pub fn label(&self) -> &str {
        match self {
            ChartPoint::Labelled { label, .. } => label,
            ChartPoint::Timed { x, .. } => x,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            ChartPoint::Labelled { value, .. } => *value,
            ChartPoint::Timed { y, .. } => *y,
        }
    }
}

fn labelled(aggregation: Aggregation<String>) -> Vec<ChartPoint> {
    aggregation
        .into_entries()
        .into_iter()
        .map(|(label, value)| ChartPoint::Labelled { label, value })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ChartBuilder {
    classifier: ColumnClassifier,
    config: ChartConfig,
}

impl ChartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(classifier: ColumnClassifier, config: ChartConfig) -> Self {
        Self { classifier, config }
    }

    pub fn build(&self, kind: ChartKind, table: &Table) -> Result<ChartPayload> {
        let payload = match kind {
            ChartKind::Bar => self.bar_chart(table)?,
            ChartKind::Line => self.line_chart(table)?,
            ChartKind::Pie => self.pie_chart(table)?,
        };
        info!(chart = %kind, points = payload.data.len(), "built chart");
        Ok(payload)
    }

    pub fn bar_chart(&self, table: &Table) -> Result<ChartPayload> {
        self.bar_chart_top(table, self.config.bar_top_n)
    }

    /// The `top_n` largest groups of the value column.
    pub fn bar_chart_top(&self, table: &Table, top_n: usize) -> Result<ChartPayload> {
        let value = self.classifier.select_value_column(table)?;
        let group = self.classifier.select_group_column(table)?;
        let sums = group_sum(&group, &value, Some(top_n))?;
        Ok(ChartPayload {
            chart_type: ChartKind::Bar,
            meta: ChartMeta::Grouped {
                group_by: group.name().to_string(),
                value: value.name().to_string(),
            },
            data: labelled(sums),
        })
    }

    pub fn line_chart(&self, table: &Table) -> Result<ChartPayload> {
        let value = self.classifier.select_value_column(table)?;
        let time = self
            .classifier
            .select_time_column(table, self.classifier.config().time_ratio)?;
        let monthly = group_sum_by_month(&time, &value)?;
        Ok(ChartPayload {
            chart_type: ChartKind::Line,
            meta: ChartMeta::Temporal {
                time: time.name.clone(),
                value: value.name().to_string(),
            },
            data: monthly
                .into_entries()
                .into_iter()
                .map(|(x, y)| ChartPoint::Timed { x, y })
                .collect(),
        })
    }

    /// Share of each group in percent, over every group.
    pub fn pie_chart(&self, table: &Table) -> Result<ChartPayload> {
        let value = self.classifier.select_value_column(table)?;
        let group = self.classifier.select_group_column(table)?;
        let sums = group_sum(&group, &value, None)?;
        Ok(ChartPayload {
            chart_type: ChartKind::Pie,
            meta: ChartMeta::Grouped {
                group_by: group.name().to_string(),
                value: value.name().to_string(),
            },
            data: labelled(percent_of_total(&sums)),
        })
    }
}
