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
use proptest::prelude::*;
use tally::{AnalyticsEngine, Table};

const REGIONS: [&str; 8] = [
    "North", "South", "East", "West", "Central", "Online", "Retail", "Export",
];

fn rows() -> impl Strategy<Value = Vec<(&'static str, i64)>> {
    prop::collection::vec((prop::sample::select(REGIONS.to_vec()), 1i64..1000), 1..40)
}

fn table(rows: &[(&'static str, i64)]) -> Table {
    let regions: Vec<&str> = rows.iter().map(|(r, _)| *r).collect();
    let sales: Vec<i64> = rows.iter().map(|(_, s)| *s).collect();
    Table::new(df!("region" => regions, "sales" => sales).expect("frame"))
}

proptest! {
    #[test]
    fn bar_chart_is_short_and_descending(rows in rows()) {
        let chart = AnalyticsEngine::new().bar_chart(&table(&rows)).expect("bar chart");
        prop_assert!(chart.data.len() <= 5);
        prop_assert!(!chart.data.is_empty());
        for pair in chart.data.windows(2) {
            prop_assert!(pair[0].value() >= pair[1].value());
        }
    }

    #[test]
    fn pie_shares_add_up_to_one_hundred(rows in rows()) {
        let chart = AnalyticsEngine::new().pie_chart(&table(&rows)).expect("pie chart");
        let total: f64 = chart.data.iter().map(|p| p.value()).sum();
        prop_assert!((total - 100.0).abs() <= 0.1, "shares sum to {}", total);
    }

    #[test]
    fn bar_totals_never_exceed_dataset_total(rows in rows()) {
        let chart = AnalyticsEngine::new().bar_chart(&table(&rows)).expect("bar chart");
        let dataset: i64 = rows.iter().map(|(_, s)| s).sum();
        let charted: f64 = chart.data.iter().map(|p| p.value()).sum();
        prop_assert!(charted <= dataset as f64);
    }
}
