// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `joinery run`: simulate one split build against a job catalog.
//!
//! The split build runs its join step, then every enabled downstream job
//! completes once (build #1, caused by the split build). Optional retries
//! rebuild individual jobs afterwards. Join builds are recorded, not run.

use anyhow::{anyhow, bail, Result};
use clap::Args;
use indexmap::IndexSet;
use joinery_core::{canonicalize, Build, BuildId, BuildResult, Cause, JobName};
use joinery_engine::{BuildLog, BuildLogger, Catalog, DownstreamSource, JoinEngine, MemoryLog};
use joinery_storage::Snapshot;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::output::{format_or_json, print_section, OutputFormat};
use crate::sim::{ScheduledBuild, SimHost};

#[derive(Args)]
pub struct RunArgs {
    /// Job catalog (TOML)
    #[arg(long)]
    pub jobs: PathBuf,
    /// Split job to run
    #[arg(long)]
    pub split: String,
    /// Build number of the split build
    #[arg(long, default_value_t = 1)]
    pub build: u64,
    /// Result of a downstream job's first build (default: success)
    #[arg(long = "result", value_name = "JOB=RESULT", value_parser = parse_job_result)]
    pub results: Vec<(String, BuildResult)>,
    /// Rebuild a downstream job after the first round, in order given
    #[arg(long = "retry", value_name = "JOB=RESULT", value_parser = parse_job_result)]
    pub retries: Vec<(String, BuildResult)>,
    /// Complete downstream jobs in reverse declaration order
    #[arg(long)]
    pub reverse: bool,
    /// Post action that fails when performed
    #[arg(long = "fail-action", value_name = "ACTION")]
    pub fail_actions: Vec<String>,
    /// Barrier snapshot to resume from and save to
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
    /// Also write the split build's log under this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

/// Parse `JOB=RESULT`, e.g. `deploy=unstable`.
pub(crate) fn parse_job_result(s: &str) -> Result<(String, BuildResult), String> {
    let (job, result) = s
        .split_once('=')
        .ok_or_else(|| format!("expected JOB=RESULT, got '{}'", s))?;
    let job = job.trim();
    if job.is_empty() {
        return Err(format!("missing job name in '{}'", s));
    }
    let result = result.trim().parse::<BuildResult>().map_err(|e| e.to_string())?;
    Ok((job.to_string(), result))
}

/// Build log that keeps lines in memory and optionally mirrors them to the
/// split build's log file.
struct RunLog<'a> {
    memory: MemoryLog,
    file: Option<(&'a BuildLogger, &'a JobName, u64)>,
}

impl BuildLog for RunLog<'_> {
    fn line(&self, message: &str) {
        self.memory.line(message);
        if let Some((logger, job, number)) = self.file {
            logger.append(job, number, message);
        }
    }
}

#[derive(Serialize)]
struct RunReport {
    split: BuildId,
    aggregate: BuildResult,
    fired: bool,
    pending: Vec<JobName>,
    completed: Vec<Completed>,
    scheduled: Vec<ScheduledBuild>,
    log: Vec<String>,
}

#[derive(Serialize)]
struct Completed {
    build: BuildId,
    result: BuildResult,
}

pub fn handle(args: RunArgs, format: OutputFormat) -> Result<()> {
    let catalog = Catalog::load(&args.jobs)?;
    let split_job = JobName::new(canonicalize("", &args.split)?);
    let Some(def) = catalog.get(&split_job) else {
        bail!("no such job: {}", split_job);
    };
    if def.join.is_none() {
        bail!("job {} has no join configuration", split_job);
    }
    let context = def.context().to_string();

    let results: HashMap<JobName, BuildResult> =
        resolve_names(&context, &args.results)?.into_iter().collect();
    let retries = resolve_names(&context, &args.retries)?;

    let mut downstream: IndexSet<JobName> = catalog
        .downstream(&split_job)
        .into_iter()
        .filter(|d| !d.disabled)
        .map(|d| d.name)
        .collect();
    if args.reverse {
        downstream.reverse();
    }

    let engine = JoinEngine::new(catalog, SimHost::new(args.fail_actions));
    if let Some(path) = &args.snapshot {
        if let Some(snapshot) = Snapshot::load(path)? {
            engine.restore(snapshot.records);
        }
    }

    let logger = args.log_dir.map(BuildLogger::new);
    let log = RunLog {
        memory: MemoryLog::new(),
        file: logger.as_ref().map(|l| (l, &split_job, args.build)),
    };

    let split = Build::new(split_job.clone(), args.build, BuildResult::Success).caused_by(Cause::User);
    engine.host().record(&split);
    let barrier = engine
        .split_performed(&split, &log)
        .ok_or_else(|| anyhow!("job {} has no join configuration", split_job))?;
    engine.build_completed(&split, &log);

    let mut completed = Vec::new();
    let rounds = downstream
        .iter()
        .map(|job| (job.clone(), results.get(job).copied().unwrap_or_default(), 1))
        .chain(numbered_retries(retries));
    for (job, result, number) in rounds {
        let build = Build::new(job, number, result)
            .caused_by(Cause::Upstream { job: split_job.clone(), build: args.build });
        engine.host().record(&build);
        engine.build_completed(&build, &log);
        completed.push(Completed { build: build.id, result });
    }

    if let Some(path) = &args.snapshot {
        Snapshot::new(engine.snapshot()).save(path)?;
    }

    let report = RunReport {
        split: split.id.clone(),
        aggregate: barrier.aggregate(),
        fired: barrier.has_fired(),
        pending: barrier.pending(),
        completed,
        scheduled: engine.host().scheduled(),
        log: log.memory.lines(),
    };
    format_or_json(format, &report, || print_report(&report))
}

/// Canonicalize `JOB=RESULT` job names against the split job's namespace.
fn resolve_names(
    context: &str,
    pairs: &[(String, BuildResult)],
) -> Result<Vec<(JobName, BuildResult)>> {
    pairs
        .iter()
        .map(|(job, result)| Ok((JobName::new(canonicalize(context, job)?), *result)))
        .collect()
}

/// Number retries per job, starting after the first round's build #1.
fn numbered_retries(
    retries: Vec<(JobName, BuildResult)>,
) -> impl Iterator<Item = (JobName, BuildResult, u64)> {
    let mut next: HashMap<JobName, u64> = HashMap::new();
    retries.into_iter().map(move |(job, result)| {
        let number = next.entry(job.clone()).or_insert(1);
        *number += 1;
        let number = *number;
        (job, result, number)
    })
}

fn print_report(report: &RunReport) {
    print_section("Build log", &report.log, "(empty)");
    println!();
    let scheduled: Vec<String> =
        report.scheduled.iter().map(|s| format!("{} ({})", s.job, s.cause)).collect();
    print_section("Scheduled", &scheduled, "nothing scheduled");
    println!();
    println!("{} {}", crate::color::header("Aggregate:"), report.aggregate);
    if !report.pending.is_empty() {
        let pending: Vec<&str> = report.pending.iter().map(JobName::as_str).collect();
        println!("{} {}", crate::color::header("Pending:"), pending.join(", "));
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
