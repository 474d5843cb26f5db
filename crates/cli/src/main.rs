// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! joinery: split/join job fan-in tools

mod color;
mod commands;
mod exit_error;
mod output;
mod sim;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{check, rename, resolve, run};
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "joinery",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")"),
    about = "Fan split-job builds back in to join jobs",
    styles = crate::color::styles(),
)]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Canonicalize a job reference against a namespace
    Resolve(resolve::ResolveArgs),
    /// Rename a job and rewrite every reference to it
    Rename(rename::RenameArgs),
    /// Validate the join references of every job
    Check(check::CheckArgs),
    /// Simulate a split build and its downstream completions
    Run(run::RunArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("JOINERY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn dispatch(cli: Cli) -> Result<()> {
    let format = cli.output;
    match cli.command {
        Commands::Resolve(args) => resolve::handle(args, format),
        Commands::Rename(args) => rename::handle(args, format),
        Commands::Check(args) => check::handle(args, format),
        Commands::Run(args) => run::handle(args, format),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = dispatch(cli) {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            if !exit.message.is_empty() {
                eprintln!("{}", exit.message);
            }
            std::process::exit(exit.code);
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
