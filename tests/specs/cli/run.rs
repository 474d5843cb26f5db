// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `joinery run` specs: simulated split builds end to end.

use super::TEAM_CATALOG;
use crate::prelude::*;

fn team() -> Project {
    let temp = Project::empty();
    temp.file("jobs.toml", TEAM_CATALOG);
    temp
}

fn run(temp: &Project, extra: &[&str]) -> CliBuilder {
    let jobs = temp.arg("jobs.toml");
    let mut args = vec!["run", "--jobs", jobs.as_str(), "--split", "team/split"];
    args.extend_from_slice(extra);
    cli().args(&args)
}

#[test]
fn all_successful_downstream_jobs_trigger_join() {
    let temp = team();

    run(&temp, &[])
        .passes()
        .stdout_has("still waiting for 3 builds to complete")
        .stdout_has("All downstream jobs complete")
        .stdout_has("Performed post action archive")
        .stdout_has("Scheduling join project: team/join")
        .stdout_has("team/join (started by join of team/split#1)")
        .stdout_has("Aggregate: success")
        .stdout_lacks("team/off");
}

#[test]
fn unstable_job_blocks_success_threshold() {
    let temp = team();

    run(&temp, &["--result", "b=unstable"])
        .passes()
        .stdout_has("nothing scheduled")
        .stdout_has("Aggregate: unstable")
        .stdout_has("Pending: team/b");
}

#[test]
fn rebuild_to_success_releases_join() {
    let temp = team();

    let json = run(&temp, &["--result", "b=unstable", "--retry", "b=success", "-o", "json"])
        .passes()
        .json();

    assert_eq!(json["fired"], true);
    assert_eq!(json["aggregate"], "success");
    assert_eq!(json["completed"][3]["build"], "team/b#2");
    assert_eq!(json["scheduled"].as_array().map(Vec::len), Some(1));
}

#[test]
fn failing_post_action_does_not_block_join() {
    let temp = team();

    run(&temp, &["--fail-action", "archive"])
        .passes()
        .stdout_has("Post action archive failed")
        .stdout_has("team/join (started by join of team/split#1)");
}

#[test]
fn json_report_describes_join() {
    let temp = team();

    let json = run(&temp, &["-o", "json"]).passes().json();

    assert_eq!(json["split"], "team/split#1");
    assert_eq!(json["fired"], true);
    assert_eq!(json["pending"], serde_json::json!([]));
    assert_eq!(
        json["scheduled"][0],
        serde_json::json!({
            "job": "team/join",
            "cause": { "type": "join", "job": "team/split", "build": 1 }
        })
    );
}

#[test]
fn reverse_completes_in_reverse_order() {
    let temp = team();

    let json = run(&temp, &["--reverse", "-o", "json"]).passes().json();

    assert_eq!(json["completed"][0]["build"], "team/c#1");
    assert_eq!(json["completed"][2]["build"], "team/a#1");
    assert_eq!(json["fired"], true);
}

#[test]
fn snapshot_resumes_open_barrier() {
    let temp = team();
    let snapshot = temp.arg("state/joins.snapshot");

    let first = run(&temp, &["--result", "b=failure", "--snapshot", &snapshot, "-o", "json"])
        .passes()
        .json();
    assert_eq!(first["fired"], false);
    assert!(temp.path().join("state/joins.snapshot").exists());

    let second = run(&temp, &["--retry", "b=success", "--snapshot", &snapshot, "-o", "json"])
        .passes()
        .json();
    assert_eq!(second["fired"], true);
    assert_eq!(second["scheduled"][0]["job"], "team/join");
    assert!(temp.path().join("state/joins.bak").exists());
}

#[test]
fn log_dir_receives_split_build_log() {
    let temp = team();
    let logs = temp.arg("logs");

    run(&temp, &["--log-dir", &logs]).passes();

    let log = temp.read("logs/build/team/split/1.log");
    assert!(log.contains("All downstream jobs complete"));
}

#[test]
fn split_without_downstream_joins_immediately() {
    let temp = Project::empty();
    temp.file(
        "jobs.toml",
        "[[job]]\nname = \"solo\"\n[job.join]\nprojects = \"after\"\n\n[[job]]\nname = \"after\"\n",
    );

    cli()
        .args(&["run", "--jobs", &temp.arg("jobs.toml"), "--split", "solo"])
        .passes()
        .stdout_has("after (started by join of solo#1)");
}

#[test]
fn unknown_split_job_fails() {
    let temp = team();

    cli()
        .args(&["run", "--jobs", &temp.arg("jobs.toml"), "--split", "nope"])
        .fails()
        .stderr_has("no such job: nope");
}

#[test]
fn job_without_join_fails() {
    let temp = team();

    cli()
        .args(&["run", "--jobs", &temp.arg("jobs.toml"), "--split", "team/a"])
        .fails()
        .stderr_has("has no join configuration");
}

#[test]
fn malformed_result_is_rejected() {
    let temp = team();

    run(&temp, &["--result", "b"]).fails().stderr_has("expected JOB=RESULT");
}
