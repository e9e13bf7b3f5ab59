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

pub mod aggregate;
pub mod charts;
pub mod classifier;
pub mod config;
pub mod error;
pub mod query;
pub mod summary;
pub mod table;
pub mod temporal;

pub use aggregate::{group_sum, group_sum_by_month, group_sum_by_year, percent_of_total, Aggregation};
pub use charts::{ChartBuilder, ChartKind, ChartMeta, ChartPayload, ChartPoint};
pub use classifier::{ColumnClassifier, ColumnRole};
pub use config::{ChartConfig, ClassifierConfig, EngineConfig, QueryConfig, SchemaConcept};
pub use error::{
    AnalyticsError, ClassificationError, ConfigError, DataError, ErrorReporter, ErrorSeverity,
    QueryError, Result,
};
pub use query::{latest_dataset, DatasetContext, QueryEngine, QuestionAnswer};
pub use summary::{Insight, SummaryEngine, SummaryPayload};
pub use table::{Table, TableColumn};
pub use temporal::{ParseProbe, TemporalColumn};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Request handed over by the upload/dashboard layer. Without a chart
/// kind the request asks for the yearly summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsRequest {
    pub dataset_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalyticsResponse {
    Chart(ChartPayload),
    Summary(SummaryPayload),
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    charts: ChartBuilder,
    summary: SummaryEngine,
    query: QueryEngine,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let classifier = ColumnClassifier::with_config(config.classifier);
        Ok(Self {
            charts: ChartBuilder::with_config(classifier.clone(), config.charts),
            summary: SummaryEngine::with_classifier(classifier.clone()),
            query: QueryEngine::with_config(classifier, config.query),
        })
    }

    pub fn bar_chart(&self, table: &Table) -> Result<ChartPayload> {
        self.charts.bar_chart(table)
    }

    pub fn bar_chart_top(&self, table: &Table, top_n: usize) -> Result<ChartPayload> {
        if top_n == 0 {
            return Err(ConfigError::InvalidTopN { value: top_n }.into());
        }
        self.charts.bar_chart_top(table, top_n)
    }

    pub fn line_chart(&self, table: &Table) -> Result<ChartPayload> {
        self.charts.line_chart(table)
    }

    pub fn pie_chart(&self, table: &Table) -> Result<ChartPayload> {
        self.charts.pie_chart(table)
    }

    pub fn chart(&self, kind: ChartKind, table: &Table) -> Result<ChartPayload> {
        self.charts.build(kind, table)
    }

    pub fn summary(&self, table: &Table) -> Result<SummaryPayload> {
        self.summary.compute_summary(table)
    }

    pub fn answer(&self, question: &str, table: &Table) -> Option<String> {
        self.query.answer(question, table)
    }

    pub fn ask(&self, question: &str, table: &Table) -> QuestionAnswer {
        self.query.ask(question, table)
    }

    pub fn dataset_context(&self, table: &Table) -> DatasetContext {
        DatasetContext::from_table(table, &self.query.config().time_markers)
    }

    /// Loads the dataset and runs the chart or summary it names.
    pub fn handle_request(&self, request: &AnalyticsRequest) -> Result<AnalyticsResponse> {
        let table = Table::from_path(&request.dataset_path)?;
        match &request.chart {
            Some(chart) => {
                let kind: ChartKind = chart.parse()?;
                Ok(AnalyticsResponse::Chart(self.chart(kind, &table)?))
            }
            None => Ok(AnalyticsResponse::Summary(self.summary(&table)?)),
        }
    }
}
