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
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of reading every cell of a column as a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseProbe {
    pub parsed: usize,
    pub total: usize,
}

impl ParseProbe {
    pub fn from_parsed(values: &[Option<NaiveDateTime>]) -> Self {
        Self {
            parsed: values.iter().filter(|v| v.is_some()).count(),
            total: values.len(),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.parsed as f64 / self.total as f64
        }
    }

    pub fn exceeds(&self, threshold: f64) -> bool {
        self.ratio() > threshold
    }
}

/// A column read as dates. The source table is left untouched; callers
/// aggregate over `values` row by row.
#[derive(Debug, Clone)]
pub struct TemporalColumn {
    pub name: String,
    pub values: Vec<Option<NaiveDateTime>>,
}

impl TemporalColumn {
    pub fn parse(column: &TableColumn<'_>, formats: &[String]) -> DataResult<Self> {
        let values = if column.is_numeric() {
            column
                .numeric_cells()?
                .into_iter()
                .map(|cell| cell.and_then(year_from_number))
                .collect()
        } else {
            column
                .text_cells()?
                .iter()
                .map(|cell| cell.as_deref().and_then(|v| parse_datetime(v, formats)))
                .collect()
        };
        Ok(Self {
            name: column.name().to_string(),
            values,
        })
    }

    pub fn probe(&self) -> ParseProbe {
        ParseProbe::from_parsed(&self.values)
    }

    pub fn distinct_years(&self) -> BTreeSet<i32> {
        self.values.iter().flatten().map(|dt| dt.year()).collect()
    }
}

pub fn parse_datetime(value: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    parse_partial_date(value)
}

/// `YYYY-MM` and bare `YYYY`, which strftime cannot read into a date.
fn parse_partial_date(value: &str) -> Option<NaiveDateTime> {
    let (year, month) = match value.split_once('-') {
        Some((year, month)) if month.len() <= 2 => (year, month.parse::<u32>().ok()?),
        Some(_) => return None,
        None => (value, 1),
    };
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)?.and_hms_opt(0, 0, 0)
}

fn year_from_number(value: f64) -> Option<NaiveDateTime> {
    if value.fract() != 0.0 || !(1.0..=9999.0).contains(&value) {
        return None;
    }
    NaiveDate::from_ymd_opt(value as i32, 1, 1)?.and_hms_opt(0, 0, 0)
}
