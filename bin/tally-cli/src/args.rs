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

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    about = "Infers column roles of a tabular dataset and prints charts, summaries and answers as JSON"
)]
pub struct Args {
    #[arg(
        long = "config",
        global = true,
        help = "YAML file overriding classifier thresholds, chart and query settings"
    )]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a bar, line or pie chart payload.
    Chart {
        #[arg(long = "dataset", help = "Path to a .csv, .parquet or .json dataset")]
        dataset: PathBuf,
        #[arg(long = "kind", help = "bar, line or pie")]
        kind: String,
        #[arg(long = "top-n", help = "Number of groups kept by the bar chart")]
        top_n: Option<usize>,
    },
    /// Year-over-year summary of the dataset.
    Summary {
        #[arg(long = "dataset")]
        dataset: PathBuf,
        #[arg(
            long = "insights",
            action,
            help = "Print dashboard insight cards instead of the raw summary"
        )]
        insights: bool,
    },
    /// Answer a question about the dataset.
    Ask {
        question: String,
        #[arg(long = "dataset", conflicts_with = "data_dir")]
        dataset: Option<PathBuf>,
        #[arg(
            long = "data-dir",
            help = "Directory of cleaned CSV exports; the latest one is used"
        )]
        data_dir: Option<PathBuf>,
    },
    /// Read an analytics request ({"dataset_path", "chart"?}) from stdin.
    Request,
}
