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

use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Min,
    Max,
    Mean,
    Sum,
    Median,
}

impl Statistic {
    /// Word used in the answer sentence.
    pub fn label(&self) -> &'static str {
        match self {
            Statistic::Min => "minimum",
            Statistic::Max => "maximum",
            Statistic::Mean => "average",
            Statistic::Sum => "total",
            Statistic::Median => "median",
        }
    }

    /// Nulls are skipped. The sum of a column without values is 0.
    pub fn compute(&self, values: &Float64Chunked) -> Option<f64> {
        match self {
            Statistic::Min => values.min(),
            Statistic::Max => values.max(),
            Statistic::Mean => values.mean(),
            Statistic::Sum => Some(values.sum().unwrap_or(0.0)),
            Statistic::Median => values.median(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extremum {
    Lowest,
    Highest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Statistic(Statistic),
    YearExtremum(Extremum),
    Trend,
}

/// Fires when the question contains any of `keywords` (case-insensitive
/// substring match).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: Vec<String>,
}

impl IntentRule {
    pub fn new(intent: Intent, keywords: &[&str]) -> Self {
        Self {
            intent,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, question: &str) -> bool {
        let question = question.to_lowercase();
        self.keywords
            .iter()
            .any(|k| question.contains(&k.to_lowercase()))
    }
}

/// Evaluation order matters: the first rule that produces an answer wins.
pub fn default_rules() -> Vec<IntentRule> {
    vec![
        IntentRule::new(
            Intent::Statistic(Statistic::Min),
            &["minimum", "min", "least"],
        ),
        IntentRule::new(
            Intent::Statistic(Statistic::Max),
            &["maximum", "max", "highest"],
        ),
        IntentRule::new(Intent::Statistic(Statistic::Mean), &["average", "mean"]),
        IntentRule::new(Intent::Statistic(Statistic::Sum), &["total", "sum"]),
        IntentRule::new(Intent::Statistic(Statistic::Median), &["median", "middle"]),
        IntentRule::new(Intent::YearExtremum(Extremum::Lowest), &["least", "minimum"]),
        IntentRule::new(
            Intent::YearExtremum(Extremum::Highest),
            &["highest", "maximum"],
        ),
        IntentRule::new(Intent::Trend, &["predict", "future", "next"]),
    ]
}

pub fn matching_rules<'a>(
    rules: &'a [IntentRule],
    question: &'a str,
) -> impl Iterator<Item = &'a IntentRule> + 'a {
    rules.iter().filter(move |rule| rule.matches(question))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_intent(question: &str) -> Option<Intent> {
        let rules = default_rules();
        let first = matching_rules(&rules, question).next().map(|r| r.intent);
        first
    }

    #[test]
    fn statistics_follow_fixed_priority() {
        assert_eq!(
            first_intent("What is the minimum sales?"),
            Some(Intent::Statistic(Statistic::Min))
        );
        // "min" outranks "average" even when both appear.
        assert_eq!(
            first_intent("average of the min values"),
            Some(Intent::Statistic(Statistic::Min))
        );
        assert_eq!(
            first_intent("What is the MEDIAN profit?"),
            Some(Intent::Statistic(Statistic::Median))
        );
        assert_eq!(
            first_intent("Total revenue please"),
            Some(Intent::Statistic(Statistic::Sum))
        );
    }

    #[test]
    fn statistics_outrank_year_extremes() {
        let rules = default_rules();
        let intents: Vec<Intent> = matching_rules(&rules, "Which year had the highest sales?")
            .map(|r| r.intent)
            .collect();
        assert_eq!(
            intents,
            [
                Intent::Statistic(Statistic::Max),
                Intent::YearExtremum(Extremum::Highest),
            ]
        );
        assert_eq!(
            first_intent("the least year"),
            Some(Intent::Statistic(Statistic::Min))
        );
    }

    #[test]
    fn unknown_question_matches_nothing() {
        assert_eq!(first_intent("hello there"), None);
        assert_eq!(first_intent("predict what happens"), Some(Intent::Trend));
    }

    #[test]
    fn statistic_compute_skips_missing() {
        let values = Float64Chunked::from_slice_options(
            "sales".into(),
            &[Some(10.0), None, Some(30.0), Some(20.0)],
        );
        assert_eq!(Statistic::Min.compute(&values), Some(10.0));
        assert_eq!(Statistic::Max.compute(&values), Some(30.0));
        assert_eq!(Statistic::Mean.compute(&values), Some(20.0));
        assert_eq!(Statistic::Sum.compute(&values), Some(60.0));
        assert_eq!(Statistic::Median.compute(&values), Some(20.0));

        let empty = Float64Chunked::from_slice_options("sales".into(), &[None, None]);
        assert_eq!(Statistic::Sum.compute(&empty), Some(0.0));
        assert_eq!(Statistic::Mean.compute(&empty), None);
        assert_eq!(Statistic::Min.compute(&empty), None);
    }
}
