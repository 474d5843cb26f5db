// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable progress lines attached to a build.

use joinery_core::{BuildId, JobName};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sink for the progress lines a build shows its users
/// ("still waiting for 3 builds", "Scheduling join project: deploy").
///
/// The wording is informational and not a compatibility surface.
pub trait BuildLog: Send + Sync {
    fn line(&self, message: &str);
}

/// Forwards lines to `tracing` at info level.
pub struct TracingLog {
    build: BuildId,
}

impl TracingLog {
    pub fn new(build: BuildId) -> Self {
        Self { build }
    }
}

impl BuildLog for TracingLog {
    fn line(&self, message: &str) {
        tracing::info!(build = %self.build, "{}", message);
    }
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// True when any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|l| l.contains(needle))
    }
}

impl BuildLog for MemoryLog {
    fn line(&self, message: &str) {
        self.lines.lock().push(message.to_string());
    }
}

/// Path of the log file for build `number` of `job`:
///   `<log_dir>/build/<job path>/<number>.log`
pub fn build_log_path(log_dir: &Path, job: &JobName, number: u64) -> PathBuf {
    let mut path = log_dir.join("build");
    for segment in job.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.join(format!("{}.log", number))
}

/// Append-only logger for per-build activity logs.
///
/// Each `append()` call opens, writes, and closes the file. This is safe
/// for the low write frequency of join events.
pub struct BuildLogger {
    log_dir: PathBuf,
}

impl BuildLogger {
    pub fn new(log_dir: PathBuf) -> Self {
        Self { log_dir }
    }

    /// Returns the base log directory path.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Append a log line for the given build.
    ///
    /// Format: `2026-01-30T08:14:09Z message`
    ///
    /// Failures are logged via tracing but do not propagate. Logging
    /// must not break join evaluation.
    pub fn append(&self, job: &JobName, number: u64, message: &str) {
        let path = build_log_path(&self.log_dir, job, number);
        if let Err(e) = write_line(&path, message) {
            tracing::warn!(
                job = %job,
                number,
                error = %e,
                "failed to write build log"
            );
        }
    }

    /// A [`BuildLog`] that appends to the file of one build.
    pub fn for_build<'a>(&'a self, job: &'a JobName, number: u64) -> BuildLogFile<'a> {
        BuildLogFile { logger: self, job, number }
    }
}

fn write_line(path: &Path, message: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    writeln!(file, "{} {}", ts, message)
}

/// Build log bound to a single build's file.
pub struct BuildLogFile<'a> {
    logger: &'a BuildLogger,
    job: &'a JobName,
    number: u64,
}

impl BuildLog for BuildLogFile<'_> {
    fn line(&self, message: &str) {
        self.logger.append(self.job, self.number, message);
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
