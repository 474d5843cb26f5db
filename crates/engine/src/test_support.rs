// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory host for tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::host::{ActionError, BuildLookup, JoinHost};
use crate::log::BuildLog;
use joinery_core::{Build, BuildId, Cause, JobName};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct FakeHostState {
    builds: HashMap<(JobName, u64), Build>,
    scheduled: Vec<(JobName, Cause)>,
    performed: Vec<(String, BuildId)>,
    failing: HashSet<String>,
}

/// Records scheduled builds and performed actions; serves recorded builds.
#[derive(Default)]
pub struct FakeHost {
    inner: Mutex<FakeHostState>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `build` visible through [`BuildLookup`].
    pub fn record(&self, build: &Build) {
        self.inner.lock().builds.insert((build.job.clone(), build.number), build.clone());
    }

    /// Make the named post action fail from now on.
    pub fn fail_action(&self, action: &str) {
        self.inner.lock().failing.insert(action.to_string());
    }

    pub fn scheduled(&self) -> Vec<(JobName, Cause)> {
        self.inner.lock().scheduled.clone()
    }

    pub fn scheduled_jobs(&self) -> Vec<JobName> {
        self.inner.lock().scheduled.iter().map(|(job, _)| job.clone()).collect()
    }

    /// Number of times `job` was scheduled.
    pub fn schedule_count(&self, job: &str) -> usize {
        self.inner.lock().scheduled.iter().filter(|(j, _)| j == job).count()
    }

    /// Post actions attempted, including failed ones.
    pub fn performed(&self) -> Vec<String> {
        self.inner.lock().performed.iter().map(|(action, _)| action.clone()).collect()
    }
}

impl JoinHost for FakeHost {
    fn perform_action(
        &self,
        action: &str,
        split: &BuildId,
        log: &dyn BuildLog,
    ) -> Result<(), ActionError> {
        let mut inner = self.inner.lock();
        inner.performed.push((action.to_string(), split.clone()));
        if inner.failing.contains(action) {
            return Err(ActionError::Failed {
                action: action.to_string(),
                message: "simulated failure".to_string(),
            });
        }
        log.line(&format!("performed {}", action));
        Ok(())
    }

    fn schedule_build(&self, job: &JobName, cause: Cause) {
        self.inner.lock().scheduled.push((job.clone(), cause));
    }
}

impl BuildLookup for FakeHost {
    fn build(&self, job: &JobName, number: u64) -> Option<Build> {
        self.inner.lock().builds.get(&(job.clone(), number)).cloned()
    }
}
