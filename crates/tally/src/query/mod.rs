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

//! Keyword-driven answers to analytic questions.
//!
//! The engine never fails: a missing concept becomes an explanatory
//! sentence and everything else it cannot handle becomes `None`.

pub mod context;
pub mod intent;
pub mod schema;

pub use context::{latest_dataset, DatasetContext, QuestionAnswer};
pub use intent::{default_rules, Extremum, Intent, IntentRule, Statistic};
pub use schema::SchemaGuard;

use crate::aggregate::group_sum_by_year;
use crate::classifier::ColumnClassifier;
use crate::config::QueryConfig;
use crate::table::{Table, TableColumn};
use crate::temporal::TemporalColumn;
use polars::prelude::Float64Chunked;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    classifier: ColumnClassifier,
    config: QueryConfig,
}

impl QueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(classifier: ColumnClassifier, config: QueryConfig) -> Self {
        Self { classifier, config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn ask(&self, question: &str, table: &Table) -> QuestionAnswer {
        QuestionAnswer {
            question: question.to_string(),
            dataset_context: Some(DatasetContext::from_table(table, &self.config.time_markers)),
            computed_answer: self.answer(question, table),
        }
    }

    pub fn answer(&self, question: &str, table: &Table) -> Option<String> {
        let columns = table.column_names();
        if let Err(missing) = SchemaGuard::new(&self.config.schema_concepts).check(question, &columns)
        {
            debug!(%missing, "question refers to a concept the dataset lacks");
            return Some(missing.to_string());
        }
        let value = self.pick_value_column(table)?;
        let values = match value.float_values() {
            Ok(values) => values,
            Err(err) => {
                debug!(column = value.name(), %err, "could not read value column");
                return None;
            }
        };
        for rule in intent::matching_rules(&self.config.rules, question) {
            let answer = match rule.intent {
                Intent::Statistic(statistic) => statistic.compute(&values).map(|result| {
                    format!(
                        "The {} {} value is {:.2}.",
                        statistic.label(),
                        value.name(),
                        result
                    )
                }),
                Intent::YearExtremum(extremum) => self.year_extremum(table, &value, extremum),
                Intent::Trend => self.trend(table, &value, &values),
            };
            if let Some(answer) = answer {
                info!(intent = ?rule.intent, column = value.name(), "answered question");
                return Some(answer);
            }
            debug!(intent = ?rule.intent, "intent matched but produced no answer");
        }
        None
    }

    /// First priority keyword that names a numeric column wins, otherwise
    /// the first numeric column.
    pub fn pick_value_column<'a>(&self, table: &'a Table) -> Option<TableColumn<'a>> {
        let numeric: Vec<TableColumn<'a>> = table.columns().filter(|c| c.is_numeric()).collect();
        self.config
            .value_priority
            .iter()
            .find_map(|key| {
                let key = key.to_lowercase();
                numeric
                    .iter()
                    .find(|c| c.name().to_lowercase().contains(&key))
                    .copied()
            })
            .or_else(|| numeric.first().copied())
    }

    fn time_column(&self, table: &Table) -> Option<TemporalColumn> {
        let column = table.columns().find(|c| {
            let name = c.name().to_lowercase();
            self.config
                .time_markers
                .iter()
                .any(|marker| name.contains(&marker.to_lowercase()))
        })?;
        match self.classifier.parse_temporal(&column) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                debug!(column = column.name(), %err, "could not parse time column");
                None
            }
        }
    }

    fn year_extremum(
        &self,
        table: &Table,
        value: &TableColumn<'_>,
        extremum: Extremum,
    ) -> Option<String> {
        let time = self.time_column(table)?;
        let yearly = match group_sum_by_year(&time, value) {
            Ok(yearly) => yearly,
            Err(err) => {
                debug!(%err, "yearly aggregation failed");
                return None;
            }
        };
        let (year, adjective) = match extremum {
            Extremum::Lowest => (yearly.min_key()?, "lowest"),
            Extremum::Highest => (yearly.max_key()?, "highest"),
        };
        Some(format!(
            "The year with the {adjective} total {} was {year}.",
            value.name()
        ))
    }

    fn trend(
        &self,
        table: &Table,
        value: &TableColumn<'_>,
        values: &Float64Chunked,
    ) -> Option<String> {
        let time = self.time_column(table)?;
        let mut rows: Vec<_> = time.values.iter().copied().zip(values).collect();
        // Undated rows sort last, like an ascending sort with nulls last.
        rows.sort_by_key(|(when, _)| (when.is_none(), *when));
        let ordered: Vec<f64> = rows.into_iter().filter_map(|(_, v)| v).collect();
        let (first, last) = match ordered.as_slice() {
            [first, .., last] => (*first, *last),
            _ => return None,
        };
        let direction = if last > first {
            "increasing"
        } else if last < first {
            "decreasing"
        } else {
            "stable"
        };
        Some(format!(
            "Based on historical data, {} shows a {direction} trend over time. \
             A precise numerical prediction would require a forecasting model.",
            value.name()
        ))
    }
}
