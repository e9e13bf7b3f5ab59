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

use crate::aggregate::{group_sum_by_year, round_to, Aggregation};
use crate::classifier::ColumnClassifier;
use crate::error::{ClassificationError, Result};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Year-over-year figures. Percentages carry one decimal, money two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPayload {
    pub trend: Option<f64>,
    pub worst_year: Option<i32>,
    pub total: f64,
    pub average: f64,
    pub best_year: Option<i32>,
    pub growth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub key: String,
    pub title: String,
    pub value: String,
    pub description: String,
}

impl Insight {
    fn new(key: &str, title: &str, value: String, description: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            value,
            description: description.to_string(),
        }
    }
}

fn percent_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v}%"))
}

fn year_or_na(value: Option<i32>) -> String {
    value.map_or_else(|| "N/A".to_string(), |y| y.to_string())
}

impl SummaryPayload {
    /// Dashboard cards in display order.
    pub fn insights(&self) -> Vec<Insight> {
        vec![
            Insight::new(
                "trend",
                "Revenue Trend",
                percent_or_na(self.trend),
                "Change from previous period",
            ),
            Insight::new(
                "worst",
                "Top Loss Year",
                year_or_na(self.worst_year),
                "Lowest aggregated value",
            ),
            Insight::new(
                "total",
                "Total Revenue",
                format!("${:.1}K", self.total / 1000.0),
                "Across all periods",
            ),
            Insight::new(
                "average",
                "Average Profit",
                format!("${:.2}K", self.average / 1000.0),
                "Mean across dataset",
            ),
            Insight::new(
                "best",
                "Best Year",
                year_or_na(self.best_year),
                "Highest performing period",
            ),
            Insight::new(
                "growth",
                "Growth Rate",
                percent_or_na(self.growth),
                "Compound annual growth",
            ),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct SummaryEngine {
    classifier: ColumnClassifier,
}

impl SummaryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classifier(classifier: ColumnClassifier) -> Self {
        Self { classifier }
    }

    pub fn compute_summary(&self, table: &Table) -> Result<SummaryPayload> {
        let time = self.classifier.select_time_column_with_year_span(table)?;
        let value = table
            .columns()
            .find(|c| c.is_numeric() && c.name() != time.name)
            .ok_or(ClassificationError::NoNumericColumn)?;
        debug!(time = %time.name, value = value.name(), "summarising by year");
        let yearly = group_sum_by_year(&time, &value)?;
        let summary = summarise_yearly(&yearly);
        info!(years = yearly.len(), total = summary.total, "computed summary");
        Ok(summary)
    }
}

/// Trend and growth compare the chronologically first and last years, not
/// the extremes.
pub fn summarise_yearly(yearly: &Aggregation<i32>) -> SummaryPayload {
    let total = yearly.total();
    let average = if yearly.is_empty() {
        0.0
    } else {
        total / yearly.len() as f64
    };
    let (first, last) = match (yearly.first(), yearly.last()) {
        (Some(first), Some(last)) if yearly.len() >= 2 => (first.1, last.1),
        _ => {
            let year = yearly.first().map(|(year, _)| *year);
            return SummaryPayload {
                trend: None,
                worst_year: year,
                total: round_to(total, 2),
                average: round_to(average, 2),
                best_year: year,
                growth: None,
            };
        }
    };
    let (trend, growth) = if first == 0.0 {
        (0.0, Some(0.0))
    } else {
        let periods = yearly.len() as f64;
        let cagr = ((last / first).powf(1.0 / (periods - 1.0)) - 1.0) * 100.0;
        (
            (last - first) / first * 100.0,
            cagr.is_finite().then(|| round_to(cagr, 1)),
        )
    };
    SummaryPayload {
        trend: Some(round_to(trend, 1)),
        worst_year: yearly.min_key().copied(),
        total: round_to(total, 2),
        average: round_to(average, 2),
        best_year: yearly.max_key().copied(),
        growth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_year_has_no_trend() {
        let summary = summarise_yearly(&Aggregation::new(vec![(2023, 150.0)]));
        assert_eq!(summary.trend, None);
        assert_eq!(summary.growth, None);
        assert_eq!(summary.best_year, Some(2023));
        assert_eq!(summary.worst_year, Some(2023));
        assert_eq!(summary.total, 150.0);
        assert_eq!(summary.average, 150.0);
    }

    #[test]
    fn negative_ratio_has_no_growth() {
        let summary = summarise_yearly(&Aggregation::new(vec![
            (2021, -100.0),
            (2022, 50.0),
            (2023, 200.0),
        ]));
        assert_eq!(summary.trend, Some(-300.0));
        assert_eq!(summary.growth, None);
        assert_eq!(summary.best_year, Some(2023));
        assert_eq!(summary.worst_year, Some(2021));
    }

    #[test]
    fn insights_format_money_in_thousands() {
        let summary = SummaryPayload {
            trend: Some(12.5),
            worst_year: Some(2021),
            total: 123_456.0,
            average: 41_152.0,
            best_year: Some(2023),
            growth: None,
        };
        let insights = summary.insights();
        let keys: Vec<_> = insights.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["trend", "worst", "total", "average", "best", "growth"]);
        assert_eq!(insights[0].value, "12.5%");
        assert_eq!(insights[1].value, "2021");
        assert_eq!(insights[2].value, "$123.5K");
        assert_eq!(insights[3].value, "$41.15K");
        assert_eq!(insights[5].value, "N/A");
    }
}
