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
use tally::{
    group_sum, group_sum_by_month, group_sum_by_year, percent_of_total, Aggregation,
    ColumnClassifier, Table,
};

fn column<'a>(table: &'a Table, name: &str) -> tally::TableColumn<'a> {
    table.column(name).expect("column exists")
}

#[test]
fn equal_sums_keep_label_order() {
    let table = Table::new(
        df!(
            "segment" => ["b", "a", "c", "d"],
            "sales" => [10.0, 10.0, 5.0, 30.0],
        )
        .expect("frame"),
    );
    let sums = group_sum(&column(&table, "segment"), &column(&table, "sales"), None)
        .expect("group sum");
    let labels: Vec<&str> = sums.entries().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(labels, ["d", "a", "b", "c"]);
}

#[test]
fn top_n_truncates_after_sorting() {
    let table = Table::new(
        df!(
            "segment" => ["a", "b", "c", "a"],
            "sales" => [1.0, 5.0, 3.0, 1.0],
        )
        .expect("frame"),
    );
    let sums = group_sum(&column(&table, "segment"), &column(&table, "sales"), Some(2))
        .expect("group sum");
    assert_eq!(
        sums.into_entries(),
        vec![("b".to_string(), 5.0), ("c".to_string(), 3.0)]
    );
}

#[test]
fn missing_cells_are_dropped_or_zeroed() {
    let table = Table::new(
        df!(
            "segment" => [Some("a"), None, Some("a"), Some("b")],
            "sales" => [Some(1.0), Some(100.0), None, Some(2.0)],
        )
        .expect("frame"),
    );
    let sums = group_sum(&column(&table, "segment"), &column(&table, "sales"), None)
        .expect("group sum");
    assert_eq!(
        sums.into_entries(),
        vec![("b".to_string(), 2.0), ("a".to_string(), 1.0)]
    );
}

#[test]
fn monthly_buckets_are_chronological() {
    let table = Table::new(
        df!(
            "order_date" => ["2024-02-10", "2023-12-31", "2024-02-01", "2024-01-15", "soon"],
            "sales" => [1.0, 2.0, 3.0, 4.0, 50.0],
        )
        .expect("frame"),
    );
    let time = ColumnClassifier::new()
        .parse_temporal(&column(&table, "order_date"))
        .expect("parsed");
    let monthly = group_sum_by_month(&time, &column(&table, "sales")).expect("monthly");
    assert_eq!(
        monthly.into_entries(),
        vec![
            ("2023-12".to_string(), 2.0),
            ("2024-01".to_string(), 4.0),
            ("2024-02".to_string(), 4.0),
        ]
    );
}

#[test]
fn yearly_buckets_accept_numeric_years() {
    let table = Table::new(
        df!(
            "year" => [2022i64, 2021, 2022],
            "profit" => [5.0, 7.0, 1.5],
        )
        .expect("frame"),
    );
    let time = ColumnClassifier::new()
        .parse_temporal(&column(&table, "year"))
        .expect("parsed");
    let yearly = group_sum_by_year(&time, &column(&table, "profit")).expect("yearly");
    assert_eq!(yearly.into_entries(), vec![(2021, 7.0), (2022, 6.5)]);
}

#[test]
fn percentages_round_to_two_decimals() {
    let shares = percent_of_total(&Aggregation::new(vec![
        ("a".to_string(), 1.0),
        ("b".to_string(), 1.0),
        ("c".to_string(), 1.0),
    ]));
    assert!(shares.entries().iter().all(|(_, v)| *v == 33.33));
}

#[test]
fn zero_total_yields_zero_percentages() {
    let shares = percent_of_total(&Aggregation::new(vec![
        ("a".to_string(), 0.0),
        ("b".to_string(), 0.0),
    ]));
    assert_eq!(shares.entries(), [("a".to_string(), 0.0), ("b".to_string(), 0.0)]);
}

#[test]
fn extremes_prefer_the_earliest_key() {
    let yearly = Aggregation::new(vec![(2020, 3.0), (2021, 9.0), (2022, 9.0), (2023, 3.0)]);
    assert_eq!(yearly.max_key(), Some(&2021));
    assert_eq!(yearly.min_key(), Some(&2020));
    assert_eq!(yearly.total(), 24.0);
}
