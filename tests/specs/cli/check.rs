// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `joinery check` specs

use super::TEAM_CATALOG;
use crate::prelude::*;

#[test]
fn valid_catalog_passes() {
    let temp = Project::empty();
    temp.file("jobs.toml", TEAM_CATALOG);

    cli()
        .args(&["check", "--jobs", &temp.arg("jobs.toml")])
        .passes()
        .stdout_has("6 jobs checked, no problems found");
}

#[test]
fn unknown_and_unbuildable_targets_fail() {
    let temp = Project::empty();
    temp.file(
        "jobs.toml",
        r#"
[[job]]
name = "split"
[job.join]
projects = "ghost"

[[job]]
name = "other"
[job.join]
projects = "folder"

[[job]]
name = "folder"
buildable = false
"#,
    );

    let run = cli().args(&["check", "--jobs", &temp.arg("jobs.toml")]).fails();
    assert_eq!(run.code(), Some(1));
    run.stdout_has("split: No such project: ghost")
        .stdout_has("other: Not buildable: folder")
        .stderr_has("2 invalid reference list(s)");
}

#[test]
fn json_lists_errors() {
    let temp = Project::empty();
    temp.file("jobs.toml", "[[job]]\nname = \"s\"\n[job.join]\nprojects = \"../up\"\n");

    let json =
        cli().args(&["check", "--jobs", &temp.arg("jobs.toml"), "-o", "json"]).fails().json();
    assert_eq!(json["jobs"], 1);
    assert_eq!(json["errors"][0]["job"], "s");
}

#[test]
fn missing_catalog_fails() {
    let temp = Project::empty();
    cli().args(&["check", "--jobs", &temp.arg("absent.toml")]).fails().stderr_has("failed to read");
}
