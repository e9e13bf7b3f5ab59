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

use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Schema reflection shipped alongside an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetContext {
    pub rows: usize,
    pub columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub time_columns: Vec<String>,
}

impl DatasetContext {
    /// `time_columns` are picked by name alone: any column containing one
    /// of `time_markers`.
    pub fn from_table(table: &Table, time_markers: &[String]) -> Self {
        let columns = table.column_names();
        let time_columns = columns
            .iter()
            .filter(|name| {
                let name = name.to_lowercase();
                time_markers
                    .iter()
                    .any(|marker| name.contains(&marker.to_lowercase()))
            })
            .cloned()
            .collect();
        Self {
            rows: table.height(),
            numeric_columns: table.numeric_column_names(),
            columns,
            time_columns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub dataset_context: Option<DatasetContext>,
    pub computed_answer: Option<String>,
}

impl QuestionAnswer {
    pub fn unanswered(question: &str) -> Self {
        Self {
            question: question.to_string(),
            dataset_context: None,
            computed_answer: None,
        }
    }
}

/// The lexicographically greatest `.csv` file in `dir`. Cleaned exports
/// carry a timestamp prefix, so this is the most recent one.
pub fn latest_dataset<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
    let entries = fs::read_dir(dir.as_ref()).ok()?;
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .max_by(|a, b| a.file_name().cmp(&b.file_name()))
}
