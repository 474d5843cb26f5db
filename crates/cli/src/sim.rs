// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process host used by `joinery run`.

use joinery_core::{Build, BuildId, Cause, JobName};
use joinery_engine::{ActionError, BuildLog, BuildLookup, JoinHost};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A build the join asked the host to start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledBuild {
    pub job: JobName,
    pub cause: Cause,
}

/// Host that keeps builds in memory and records scheduling requests
/// instead of running anything.
#[derive(Default)]
pub struct SimHost {
    builds: Mutex<HashMap<(JobName, u64), Build>>,
    scheduled: Mutex<Vec<ScheduledBuild>>,
    failing: HashSet<String>,
}

impl SimHost {
    /// Host whose post actions named in `failing` report a failure.
    pub fn new(failing: impl IntoIterator<Item = String>) -> Self {
        Self { failing: failing.into_iter().collect(), ..Self::default() }
    }

    pub fn record(&self, build: &Build) {
        self.builds.lock().insert((build.job.clone(), build.number), build.clone());
    }

    pub fn scheduled(&self) -> Vec<ScheduledBuild> {
        self.scheduled.lock().clone()
    }
}

impl JoinHost for SimHost {
    fn perform_action(
        &self,
        action: &str,
        split: &BuildId,
        log: &dyn BuildLog,
    ) -> Result<(), ActionError> {
        if self.failing.contains(action) {
            return Err(ActionError::Failed {
                action: action.to_string(),
                message: format!("simulated failure for {}", split),
            });
        }
        log.line(&format!("Performed post action {}", action));
        Ok(())
    }

    fn schedule_build(&self, job: &JobName, cause: Cause) {
        tracing::debug!(job = %job, cause = %cause, "build scheduled");
        self.scheduled.lock().push(ScheduledBuild { job: job.clone(), cause });
    }
}

impl BuildLookup for SimHost {
    fn build(&self, job: &JobName, number: u64) -> Option<Build> {
        self.builds.lock().get(&(job.clone(), number)).cloned()
    }
}

#[cfg(test)]
#[path = "sim_tests.rs"]
mod tests;
