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

//! Role inference for columns of an unknown schema.
//!
//! Every selector walks the table in column order and is recomputed on each
//! call; nothing is cached between calls.

use crate::config::ClassifierConfig;
use crate::error::{ClassificationError, Result};
use crate::table::{Table, TableColumn};
use crate::temporal::{ParseProbe, TemporalColumn};
use polars::prelude::ChunkVar;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    Value,
    Group,
    Time,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Value => "value",
            ColumnRole::Group => "group",
            ColumnRole::Time => "time",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColumnClassifier {
    config: ClassifierConfig,
}

impl ColumnClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn parse_temporal(&self, column: &TableColumn<'_>) -> Result<TemporalColumn> {
        Ok(TemporalColumn::parse(column, &self.config.temporal_formats)?)
    }

    pub fn probe(&self, column: &TableColumn<'_>) -> Result<ParseProbe> {
        Ok(self.parse_temporal(column)?.probe())
    }

    /// The numeric column with the largest sample variance. Equal variances
    /// keep the earlier column.
    pub fn select_value_column<'a>(&self, table: &'a Table) -> Result<TableColumn<'a>> {
        let mut best: Option<(TableColumn<'a>, Option<f64>)> = None;
        for column in table.columns().filter(|c| c.is_numeric()) {
            let values = column.float_values()?;
            // Sample variance is undefined below two present values.
            let variance = if values.len() - values.null_count() < 2 {
                None
            } else {
                values.var(1)
            };
            let replaces = match &best {
                None => true,
                Some((_, current)) => match (variance, current) {
                    (Some(candidate), Some(current)) => candidate > *current,
                    (Some(_), None) => true,
                    _ => false,
                },
            };
            if replaces {
                best = Some((column, variance));
            }
        }
        let (column, variance) = best.ok_or(ClassificationError::NoNumericColumn)?;
        debug!(
            column = column.name(),
            ?variance,
            role = ColumnRole::Value.as_str(),
            "selected column"
        );
        Ok(column)
    }

    /// The first non-numeric column that does not look like dates.
    pub fn select_group_column<'a>(&self, table: &'a Table) -> Result<TableColumn<'a>> {
        for column in table.columns().filter(|c| !c.is_numeric()) {
            let probe = self.probe(&column)?;
            if probe.exceeds(self.config.group_date_ratio) {
                debug!(
                    column = column.name(),
                    ratio = probe.ratio(),
                    "skipping date-like column for grouping"
                );
                continue;
            }
            debug!(
                column = column.name(),
                role = ColumnRole::Group.as_str(),
                "selected column"
            );
            return Ok(column);
        }
        Err(ClassificationError::NoCategoricalColumn.into())
    }

    pub fn select_time_column(&self, table: &Table, threshold: f64) -> Result<TemporalColumn> {
        self.first_time_column(table, threshold, |_| true)
            .and_then(|found| {
                found.ok_or_else(|| ClassificationError::NoTimeColumn { threshold }.into())
            })
    }

    /// Like `select_time_column` at the configured ratio, but the parsed
    /// values must also yield at least one calendar year.
    pub fn select_time_column_with_year_span(&self, table: &Table) -> Result<TemporalColumn> {
        self.first_time_column(table, self.config.time_ratio, |parsed| {
            !parsed.distinct_years().is_empty()
        })
        .and_then(|found| found.ok_or_else(|| ClassificationError::NoValidTimeColumn.into()))
    }

    fn first_time_column<F>(
        &self,
        table: &Table,
        threshold: f64,
        accept: F,
    ) -> Result<Option<TemporalColumn>>
    where
        F: Fn(&TemporalColumn) -> bool,
    {
        for column in table.columns().filter(|c| !c.is_numeric()) {
            let parsed = self.parse_temporal(&column)?;
            let probe = parsed.probe();
            if probe.exceeds(threshold) && accept(&parsed) {
                debug!(
                    column = column.name(),
                    ratio = probe.ratio(),
                    role = ColumnRole::Time.as_str(),
                    "selected column"
                );
                return Ok(Some(parsed));
            }
        }
        Ok(None)
    }
}
