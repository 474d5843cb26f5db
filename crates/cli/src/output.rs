// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print `data` as pretty JSON, or run `text_fn` for text output.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            text_fn();
        }
    }
    Ok(())
}

/// Print a section header followed by indented lines, or `empty` when
/// there are none.
pub fn print_section(title: &str, lines: &[String], empty: &str) {
    println!("{}", crate::color::header(title));
    if lines.is_empty() {
        println!("  {}", crate::color::muted(empty));
    }
    for line in lines {
        println!("  {}", line);
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
