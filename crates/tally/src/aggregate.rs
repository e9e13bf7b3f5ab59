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

use crate::error::DataResult;
use crate::table::TableColumn;
use crate::temporal::TemporalColumn;
use chrono::Datelike;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

/// Ordered bucket sums. The order is set by the producing function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation<K> {
    entries: Vec<(K, f64)>,
}

impl<K> Aggregation<K> {
    pub fn new(entries: Vec<(K, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(K, f64)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(K, f64)> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn first(&self) -> Option<&(K, f64)> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&(K, f64)> {
        self.entries.last()
    }

    /// Key of the largest sum; the earliest entry wins ties.
    pub fn max_key(&self) -> Option<&K> {
        self.extreme_key(|candidate, best| candidate > best)
    }

    /// Key of the smallest sum; the earliest entry wins ties.
    pub fn min_key(&self) -> Option<&K> {
        self.extreme_key(|candidate, best| candidate < best)
    }

    fn extreme_key<F>(&self, better: F) -> Option<&K>
    where
        F: Fn(f64, f64) -> bool,
    {
        let mut entries = self.entries.iter();
        let mut best = entries.next()?;
        for entry in entries {
            if better(entry.1, best.1) {
                best = entry;
            }
        }
        Some(&best.0)
    }

    pub fn truncate(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }
}

fn sum_by_key<K, I>(keys: I, values: &[Option<f64>]) -> BTreeMap<K, f64>
where
    K: Ord,
    I: IntoIterator<Item = Option<K>>,
{
    let mut sums = BTreeMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        // Rows without a key never form their own bucket.
        if let Some(key) = key {
            *sums.entry(key).or_insert(0.0) += value.unwrap_or(0.0);
        }
    }
    sums
}

/// Sums `values` per distinct label of `groups`, largest first. Equal sums
/// stay in label order. `top_n` of `None` keeps every group.
pub fn group_sum(
    groups: &TableColumn<'_>,
    values: &TableColumn<'_>,
    top_n: Option<usize>,
) -> DataResult<Aggregation<String>> {
    let sums = sum_by_key(groups.text_cells()?, &values.numeric_cells()?);
    let entries = sums
        .into_iter()
        .sorted_by(|a, b| b.1.total_cmp(&a.1))
        .take(top_n.unwrap_or(usize::MAX))
        .collect();
    Ok(Aggregation::new(entries))
}

/// Monthly sums labelled `YYYY-MM`, oldest first.
pub fn group_sum_by_month(
    time: &TemporalColumn,
    values: &TableColumn<'_>,
) -> DataResult<Aggregation<String>> {
    let keys = time
        .values
        .iter()
        .map(|dt| dt.map(|dt| (dt.year(), dt.month())));
    let sums = sum_by_key(keys, &values.numeric_cells()?);
    let entries = sums
        .into_iter()
        .map(|((year, month), sum)| (format!("{year:04}-{month:02}"), sum))
        .collect();
    Ok(Aggregation::new(entries))
}

/// Yearly sums, oldest first.
pub fn group_sum_by_year(
    time: &TemporalColumn,
    values: &TableColumn<'_>,
) -> DataResult<Aggregation<i32>> {
    let keys = time.values.iter().map(|dt| dt.map(|dt| dt.year()));
    let sums = sum_by_key(keys, &values.numeric_cells()?);
    Ok(Aggregation::new(sums.into_iter().collect()))
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Each sum as a percentage of the sum of all entries, rounded to two
/// decimals. A zero total maps every entry to zero.
pub fn percent_of_total<K: Clone>(aggregation: &Aggregation<K>) -> Aggregation<K> {
    let total = aggregation.total();
    let entries = aggregation
        .entries()
        .iter()
        .map(|(key, value)| {
            let percent = if total == 0.0 {
                0.0
            } else {
                round_to(value / total * 100.0, 2)
            };
            (key.clone(), percent)
        })
        .collect();
    Aggregation::new(entries)
}
