// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `joinery check`: validate the join references of a job catalog.

use anyhow::Result;
use clap::Args;
use joinery_engine::Catalog;
use serde::Serialize;
use std::path::PathBuf;

use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct CheckArgs {
    /// Job catalog (TOML)
    #[arg(long)]
    pub jobs: PathBuf,
}

#[derive(Serialize)]
struct Problem {
    job: String,
    error: String,
}

#[derive(Serialize)]
struct Report {
    jobs: usize,
    errors: Vec<Problem>,
}

pub fn handle(args: CheckArgs, format: OutputFormat) -> Result<()> {
    let catalog = Catalog::load(&args.jobs)?;
    let errors: Vec<Problem> = catalog
        .validate()
        .into_iter()
        .map(|(job, e)| Problem { job: job.to_string(), error: e.to_string() })
        .collect();
    let report = Report { jobs: catalog.len(), errors };

    format_or_json(format, &report, || {
        for problem in &report.errors {
            println!("{}: {}", problem.job, problem.error);
        }
        if report.errors.is_empty() {
            println!("{} jobs checked, no problems found", report.jobs);
        }
    })?;

    if report.errors.is_empty() {
        Ok(())
    } else {
        Err(ExitError::new(1, format!("{} invalid reference list(s)", report.errors.len())).into())
    }
}
