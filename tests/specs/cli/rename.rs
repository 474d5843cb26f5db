// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `joinery rename` specs

use super::TEAM_CATALOG;
use crate::prelude::*;

#[test]
fn rename_rewrites_references_in_place() {
    let temp = Project::empty();
    temp.file("jobs.toml", TEAM_CATALOG);

    cli()
        .args(&["rename", "--jobs", &temp.arg("jobs.toml"), "--parent", "team", "join", "merge"])
        .passes()
        .stdout_has("Updated team/split")
        .stdout_has("Updated team/merge");

    let saved = temp.read("jobs.toml");
    assert!(saved.contains("name = \"team/merge\""));
    assert!(saved.contains("projects = \"merge\""));
    assert!(!saved.contains("team/join"));
}

#[test]
fn renamed_catalog_still_validates() {
    let temp = Project::empty();
    temp.file("jobs.toml", TEAM_CATALOG);

    cli()
        .args(&["rename", "--jobs", &temp.arg("jobs.toml"), "--parent", "team", "a", "alpha"])
        .passes();
    cli().args(&["check", "--jobs", &temp.arg("jobs.toml")]).passes();
}

#[test]
fn unrelated_rename_leaves_file_untouched() {
    let temp = Project::empty();
    temp.file("jobs.toml", TEAM_CATALOG);

    cli()
        .args(&["rename", "--jobs", &temp.arg("jobs.toml"), "ghost", "spirit"])
        .passes()
        .stdout_eq("No job configuration changed\n");
    assert_eq!(temp.read("jobs.toml"), TEAM_CATALOG);
}

#[test]
fn rename_onto_existing_job_fails() {
    let temp = Project::empty();
    temp.file("jobs.toml", TEAM_CATALOG);

    cli()
        .args(&["rename", "--jobs", &temp.arg("jobs.toml"), "--parent", "team", "a", "b"])
        .fails()
        .stderr_has("job already exists: team/b");
}

#[test]
fn json_lists_changed_jobs() {
    let temp = Project::empty();
    temp.file("jobs.toml", TEAM_CATALOG);

    let json = cli()
        .args(&["rename", "--jobs", &temp.arg("jobs.toml"), "--parent", "team", "c", "gamma", "-o", "json"])
        .passes()
        .json();
    assert_eq!(json["changed"], serde_json::json!(["team/split", "team/gamma"]));
}
