// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `joinery resolve`: canonicalize a job reference.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct ResolveArgs {
    /// Namespace the reference is relative to ("" for the root)
    pub context: String,
    /// Job reference, e.g. "../other/job" or "/team/job"
    pub reference: String,
}

#[derive(Serialize)]
struct Resolved<'a> {
    context: &'a str,
    reference: &'a str,
    canonical: String,
}

pub fn handle(args: ResolveArgs, format: OutputFormat) -> Result<()> {
    let canonical = joinery_core::canonicalize(&args.context, &args.reference)?;
    let resolved =
        Resolved { context: &args.context, reference: &args.reference, canonical };
    format_or_json(format, &resolved, || println!("{}", resolved.canonical))
}
