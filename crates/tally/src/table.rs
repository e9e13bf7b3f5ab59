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

//! Read-only view over a polars `DataFrame`.
//!
//! Column order is part of the contract: every "first qualifying column"
//! rule in the classifier walks `Table::columns` front to back.

use crate::error::{DataError, DataResult};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
}

#[derive(Debug, Clone, Copy)]
pub struct TableColumn<'a> {
    column: &'a Column,
}

pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

impl Table {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn from_csv<P: AsRef<Path>>(path: P) -> DataResult<Self> {
        let path = path.as_ref();
        let file = open(path)?;
        let frame = CsvReader::new(file)
            .finish()
            .map_err(|source| file_error(path, source))?;
        debug!(path = %path.display(), rows = frame.height(), "loaded csv dataset");
        Ok(Self::new(frame))
    }

    pub fn from_parquet<P: AsRef<Path>>(path: P) -> DataResult<Self> {
        let path = path.as_ref();
        let file = open(path)?;
        let frame = ParquetReader::new(file)
            .finish()
            .map_err(|source| file_error(path, source))?;
        Ok(Self::new(frame))
    }

    pub fn from_json<P: AsRef<Path>>(path: P) -> DataResult<Self> {
        let path = path.as_ref();
        let file = open(path)?;
        let frame = JsonReader::new(file)
            .finish()
            .map_err(|source| file_error(path, source))?;
        Ok(Self::new(frame))
    }

    /// Picks a reader from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> DataResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Self::from_csv(path),
            "parquet" => Self::from_parquet(path),
            "json" => Self::from_json(path),
            other => Err(DataError::UnsupportedFormat {
                format: if other.is_empty() {
                    path.display().to_string()
                } else {
                    other.to_string()
                },
            }),
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn columns(&self) -> impl Iterator<Item = TableColumn<'_>> {
        self.frame.get_columns().iter().map(|column| TableColumn { column })
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns().map(|c| c.name().to_string()).collect()
    }

    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns()
            .filter(|c| c.is_numeric())
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn column(&self, name: &str) -> DataResult<TableColumn<'_>> {
        self.columns()
            .find(|c| c.name() == name)
            .ok_or_else(|| DataError::ColumnNotFound {
                column: name.to_string(),
            })
    }
}

impl From<DataFrame> for Table {
    fn from(frame: DataFrame) -> Self {
        Self::new(frame)
    }
}

impl<'a> TableColumn<'a> {
    pub fn name(&self) -> &'a str {
        self.column.name().as_str()
    }

    pub fn is_numeric(&self) -> bool {
        is_numeric_dtype(self.column.dtype())
    }

    pub fn len(&self) -> usize {
        self.column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The column cast to `Float64`. Non-numeric cells become nulls, which
    /// polars reductions skip.
    pub fn float_values(&self) -> DataResult<Float64Chunked> {
        let series = self
            .column
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        Ok(series.f64()?.clone())
    }

    /// Cells as floats in row order.
    pub fn numeric_cells(&self) -> DataResult<Vec<Option<f64>>> {
        Ok(self.float_values()?.into_iter().collect())
    }

    /// Cells in their string form, e.g. group labels.
    pub fn text_cells(&self) -> DataResult<Vec<Option<String>>> {
        let series = self
            .column
            .as_materialized_series()
            .cast(&DataType::String)?;
        Ok(series
            .str()?
            .into_iter()
            .map(|cell| cell.map(str::to_string))
            .collect())
    }
}

fn open(path: &Path) -> DataResult<File> {
    File::open(path).map_err(|err| file_error(path, PolarsError::from(err)))
}

fn file_error(path: &Path, source: PolarsError) -> DataError {
    DataError::DataFileError {
        path: path.display().to_string(),
        source,
    }
}
