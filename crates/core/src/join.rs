// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted state of a split build's completion barrier.

use crate::id::{BuildId, JobName};
use crate::result::BuildResult;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Everything a completion barrier knows, stored with the split build's
/// record so it survives host restarts.
///
/// Only the barrier mutates this, under its own lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinState {
    /// Job of the split build that owns the barrier
    pub split_job: JobName,
    pub split_number: u64,
    /// Downstream jobs still expected to report
    pub pending: IndexSet<JobName>,
    /// Results seen per downstream job, oldest first
    #[serde(default)]
    pub observed: IndexMap<JobName, Vec<BuildResult>>,
    /// Builds already folded into `observed`
    #[serde(default)]
    pub considered: IndexSet<BuildId>,
    pub aggregate: BuildResult,
    pub threshold: BuildResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<JobName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_actions: Vec<String>,
    /// Set once post actions ran and targets were scheduled
    #[serde(default)]
    pub fired: bool,
    /// Join jobs already started by a predicate edge
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub claimed: IndexSet<JobName>,
}

impl JoinState {
    pub fn new(
        split_job: impl Into<JobName>,
        split_number: u64,
        pending: IndexSet<JobName>,
        threshold: BuildResult,
    ) -> Self {
        Self {
            split_job: split_job.into(),
            split_number,
            pending,
            observed: IndexMap::new(),
            considered: IndexSet::new(),
            aggregate: BuildResult::Success,
            threshold,
            targets: Vec::new(),
            post_actions: Vec::new(),
            fired: false,
            claimed: IndexSet::new(),
        }
    }

    crate::setters! {
        set {
            targets: Vec<JobName>,
            post_actions: Vec<String>,
        }
    }

    pub fn split(&self) -> BuildId {
        BuildId::of(&self.split_job, self.split_number)
    }

    /// True when `job` was part of the declared fan-out.
    pub fn is_declared(&self, job: &JobName) -> bool {
        self.pending.contains(job) || self.observed.contains_key(job)
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Best result recorded for `job`, if it reported at all.
    pub fn best_result(&self, job: &JobName) -> Option<BuildResult> {
        self.observed.get(job).and_then(|results| results.iter().min().copied())
    }
}

#[cfg(test)]
#[path = "join_tests.rs"]
mod tests;
