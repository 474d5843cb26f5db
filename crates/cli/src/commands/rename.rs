// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `joinery rename`: rename a job and rewrite every reference to it.

use anyhow::Result;
use clap::Args;
use joinery_engine::Catalog;
use serde::Serialize;
use std::path::PathBuf;

use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct RenameArgs {
    /// Job catalog (TOML), rewritten in place when anything changes
    #[arg(long)]
    pub jobs: PathBuf,
    /// Namespace containing the renamed job ("" for the root)
    #[arg(long, default_value = "")]
    pub parent: String,
    /// Current short name
    pub old: String,
    /// New short name
    pub new: String,
}

#[derive(Serialize)]
struct Renamed {
    changed: Vec<String>,
}

pub fn handle(args: RenameArgs, format: OutputFormat) -> Result<()> {
    let mut catalog = Catalog::load(&args.jobs)?;
    let changed = catalog.rename_job(&args.parent, &args.old, &args.new)?;
    if !changed.is_empty() {
        catalog.save(&args.jobs)?;
    }

    let renamed = Renamed { changed: changed.iter().map(ToString::to_string).collect() };
    format_or_json(format, &renamed, || {
        if renamed.changed.is_empty() {
            println!("No job configuration changed");
        }
        for job in &renamed.changed {
            println!("Updated {}", job);
        }
    })
}
