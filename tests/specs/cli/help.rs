// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("resolve")
        .stdout_has("rename")
        .stdout_has("check")
        .stdout_has("run");
}

#[test]
fn run_help_shows_options() {
    cli()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--split")
        .stdout_has("--retry")
        .stdout_has("JOB=RESULT");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn unknown_command_fails() {
    cli().args(&["frobnicate"]).fails();
}
