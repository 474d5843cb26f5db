// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build records and the causes that started them.

use crate::id::{BuildId, JobName};
use crate::result::BuildResult;
use serde::{Deserialize, Serialize};

/// Why a build was scheduled.
///
/// Serializes with a `type` tag:
/// - `{"type":"user"}`
/// - `{"type":"upstream","job":"split","build":3}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cause {
    /// Started by hand
    User,
    /// Started by a schedule
    Timer,
    /// Triggered by the completion of another build
    Upstream { job: JobName, build: u64 },
    /// Scheduled by a completed join. Carries the split build that fanned
    /// out, and is never treated as an upstream link back to it.
    Join { job: JobName, build: u64 },
}

impl Cause {
    /// Upstream job and build number, for genuine upstream causes only.
    pub fn upstream(&self) -> Option<(&JobName, u64)> {
        match self {
            Cause::Upstream { job, build } => Some((job, *build)),
            _ => None,
        }
    }

    /// True for causes produced by the join machinery itself.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Cause::Join { .. })
    }
}

impl std::fmt::Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cause::User => write!(f, "started by user"),
            Cause::Timer => write!(f, "started by timer"),
            Cause::Upstream { job, build } => write!(f, "started by upstream {}#{}", job, build),
            Cause::Join { job, build } => write!(f, "started by join of {}#{}", job, build),
        }
    }
}

/// A single execution of a job, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub id: BuildId,
    pub job: JobName,
    pub number: u64,
    pub result: BuildResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<Cause>,
}

impl Build {
    pub fn new(job: impl Into<JobName>, number: u64, result: BuildResult) -> Self {
        let job = job.into();
        Self { id: BuildId::of(&job, number), job, number, result, causes: Vec::new() }
    }

    /// Append a cause, keeping causes in the order they were recorded.
    pub fn caused_by(mut self, cause: Cause) -> Self {
        self.causes.push(cause);
        self
    }

    /// Genuine upstream causes, in recorded order.
    pub fn upstream_causes(&self) -> impl Iterator<Item = (&JobName, u64)> {
        self.causes.iter().filter(|c| !c.is_synthetic()).filter_map(Cause::upstream)
    }
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
