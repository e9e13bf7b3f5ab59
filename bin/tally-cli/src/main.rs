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

pub mod args;

use anyhow::{bail, Context, Result};
use args::{Args, Command};
use clap::Parser;
use serde_json::json;
use std::io::Read;
use tally::{
    latest_dataset, AnalyticsEngine, AnalyticsError, AnalyticsRequest, ChartKind, EngineConfig,
    ErrorReporter, QuestionAnswer, Table,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        match err.downcast_ref::<AnalyticsError>() {
            Some(analytics) => eprint!("{}", ErrorReporter::new().report(analytics)),
            None => eprintln!("tally failed: {err:#}"),
        }
        std::process::exit(1);
    }
}

fn build_engine(args: &Args) -> Result<AnalyticsEngine> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_yaml_file(path)
            .map_err(AnalyticsError::from)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(AnalyticsEngine::with_config(config)?)
}

fn load(path: &std::path::Path) -> Result<Table> {
    let table = Table::from_path(path).map_err(AnalyticsError::from)?;
    info!(path = %path.display(), rows = table.height(), columns = table.width(), "dataset loaded");
    Ok(table)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(AnalyticsError::from)?;
    println!("{rendered}");
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let engine = build_engine(&args)?;
    match args.command {
        Command::Chart {
            dataset,
            kind,
            top_n,
        } => {
            let kind: ChartKind = kind.parse().map_err(AnalyticsError::from)?;
            let table = load(&dataset)?;
            let payload = match (kind, top_n) {
                (ChartKind::Bar, Some(top_n)) => engine.bar_chart_top(&table, top_n)?,
                _ => engine.chart(kind, &table)?,
            };
            print_json(&payload)
        }
        Command::Summary { dataset, insights } => {
            let table = load(&dataset)?;
            let summary = engine.summary(&table)?;
            if insights {
                print_json(&json!({ "insights": summary.insights() }))
            } else {
                print_json(&summary)
            }
        }
        Command::Ask {
            question,
            dataset,
            data_dir,
        } => {
            let path = match (dataset, data_dir) {
                (Some(path), _) => Some(path),
                (None, Some(dir)) => latest_dataset(&dir),
                (None, None) => bail!("either --dataset or --data-dir is required"),
            };
            let answer = match path {
                Some(path) => engine.ask(&question, &load(&path)?),
                None => QuestionAnswer::unanswered(&question),
            };
            print_json(&answer)
        }
        Command::Request => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("reading request from stdin")?;
            let request: AnalyticsRequest = serde_json::from_str(&input)
                .map_err(AnalyticsError::from)
                .context("parsing analytics request")?;
            let response = engine.handle_request(&request)?;
            print_json(&response)
        }
    }
}
