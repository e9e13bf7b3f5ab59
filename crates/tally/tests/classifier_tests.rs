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
    AnalyticsError, ClassificationError, ColumnClassifier, EngineConfig, Table,
};

fn orders() -> Table {
    Table::new(
        df!(
            "order_date" => ["2024-01-01", "2024-02-01", "2024-03-01", "2024-04-01", "n/a"],
            "region" => ["North", "South", "North", "East", "West"],
            "units" => [1i64, 2, 3, 4, 5],
            "sales" => [100.0, 500.0, 900.0, 50.0, 10.0],
        )
        .expect("orders frame"),
    )
}

#[test]
fn value_column_has_largest_variance() {
    let table = orders();
    let classifier = ColumnClassifier::new();
    let value = classifier.select_value_column(&table).expect("value column");
    assert_eq!(value.name(), "sales");
}

#[test]
fn equal_variance_keeps_earlier_column() {
    let table = Table::new(df!("a" => [1i64, 2, 3], "b" => [2i64, 3, 4]).expect("frame"));
    let value = ColumnClassifier::new()
        .select_value_column(&table)
        .expect("value column");
    assert_eq!(value.name(), "a");
}

#[test]
fn single_row_falls_back_to_first_numeric_column() {
    let table = Table::new(df!("label" => ["x"], "a" => [5i64], "b" => [7i64]).expect("frame"));
    let value = ColumnClassifier::new()
        .select_value_column(&table)
        .expect("value column");
    assert_eq!(value.name(), "a");
}

#[test]
fn variance_skips_missing_cells() {
    let table = Table::new(
        df!(
            "sales" => [10.0, 20.0, 30.0],
            "margin" => [Some(1.0), None, Some(100.0)],
            "spike" => [Some(10_000.0), None, None],
        )
        .expect("frame"),
    );
    let value = ColumnClassifier::new()
        .select_value_column(&table)
        .expect("value column");
    assert_eq!(value.name(), "margin");
}

#[test]
fn missing_numeric_column_is_an_error() {
    let table = Table::new(df!("region" => ["North", "South"]).expect("frame"));
    let err = ColumnClassifier::new()
        .select_value_column(&table)
        .unwrap_err();
    assert!(matches!(
        err,
        AnalyticsError::Classification(ClassificationError::NoNumericColumn)
    ));
}

#[test]
fn group_column_skips_date_like_text() {
    let table = orders();
    let group = ColumnClassifier::new()
        .select_group_column(&table)
        .expect("group column");
    assert_eq!(group.name(), "region");
}

#[test]
fn only_dates_leave_no_group_column() {
    let table = Table::new(
        df!(
            "day" => ["2024-01-01", "2024-01-02"],
            "sales" => [1.0, 2.0],
        )
        .expect("frame"),
    );
    let err = ColumnClassifier::new()
        .select_group_column(&table)
        .unwrap_err();
    assert!(matches!(
        err,
        AnalyticsError::Classification(ClassificationError::NoCategoricalColumn)
    ));
}

#[test]
fn time_ratio_must_be_strictly_exceeded() {
    let table = orders();
    let classifier = ColumnClassifier::new();

    let err = classifier.select_time_column(&table, 0.8).unwrap_err();
    assert!(matches!(
        err,
        AnalyticsError::Classification(ClassificationError::NoTimeColumn { threshold })
            if threshold == 0.8
    ));

    let time = classifier
        .select_time_column(&table, 0.7)
        .expect("time column");
    assert_eq!(time.name, "order_date");
    assert_eq!(time.probe().parsed, 4);
    assert!(time.values[4].is_none());
}

#[test]
fn year_span_selection_follows_configured_ratio() {
    let table = orders();

    let err = ColumnClassifier::new()
        .select_time_column_with_year_span(&table)
        .unwrap_err();
    assert!(matches!(
        err,
        AnalyticsError::Classification(ClassificationError::NoValidTimeColumn)
    ));

    let lenient = ColumnClassifier::with_config(EngineConfig::lenient().classifier);
    let time = lenient
        .select_time_column_with_year_span(&table)
        .expect("time column");
    assert_eq!(time.name, "order_date");
    assert_eq!(time.distinct_years().into_iter().collect::<Vec<_>>(), [2024]);
}

#[test]
fn selection_is_repeatable() {
    let table = orders();
    let classifier = ColumnClassifier::new();
    let first = classifier.select_value_column(&table).expect("value").name();
    let second = classifier.select_value_column(&table).expect("value").name();
    assert_eq!(first, second);
}
