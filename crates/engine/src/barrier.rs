// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-split-build completion barrier.
//!
//! A barrier is created when a split build runs. Every downstream build
//! reports into it exactly once; when the last expected job reports and the
//! aggregate meets the threshold, the barrier runs the post actions and
//! schedules the join targets. That happens at most once per barrier.

use crate::host::{Downstream, JoinHost};
use crate::log::BuildLog;
use indexmap::IndexSet;
use joinery_core::{BuildId, BuildResult, Cause, JobName, JoinState};
use parking_lot::Mutex;

/// What the join does once the fan-out closes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinSpec {
    pub targets: Vec<JobName>,
    pub threshold: BuildResult,
    pub post_actions: Vec<String>,
}

/// Completion tracker owned by one split build.
///
/// All mutation happens under one lock, so concurrent reports from many
/// downstream builds serialize here.
#[derive(Debug)]
pub struct CompletionBarrier {
    split: BuildId,
    state: Mutex<JoinState>,
}

impl CompletionBarrier {
    /// Create a barrier expecting every enabled job in `downstream`.
    ///
    /// Call [`check_and_fire`](Self::check_and_fire) afterwards: a split
    /// with no enabled downstream jobs joins immediately.
    pub fn new(
        split_job: &JobName,
        split_number: u64,
        downstream: &[Downstream],
        spec: JoinSpec,
    ) -> Self {
        let pending: IndexSet<JobName> =
            downstream.iter().filter(|d| !d.disabled).map(|d| d.name.clone()).collect();
        let state = JoinState::new(split_job.clone(), split_number, pending, spec.threshold)
            .targets(spec.targets)
            .post_actions(spec.post_actions);
        Self::restore(state)
    }

    /// Rebuild a barrier from persisted state.
    pub fn restore(state: JoinState) -> Self {
        Self { split: state.split(), state: Mutex::new(state) }
    }

    pub fn split(&self) -> &BuildId {
        &self.split
    }

    pub fn snapshot(&self) -> JoinState {
        self.state.lock().clone()
    }

    pub fn aggregate(&self) -> BuildResult {
        self.state.lock().aggregate
    }

    pub fn is_complete(&self) -> bool {
        self.state.lock().is_complete()
    }

    pub fn has_fired(&self) -> bool {
        self.state.lock().fired
    }

    /// Jobs still expected to report, in declaration order.
    pub fn pending(&self) -> Vec<JobName> {
        self.state.lock().pending.iter().cloned().collect()
    }

    /// Record that `build` of downstream `job` finished with `result`.
    ///
    /// Returns true when no downstream job is pending afterwards. Reports
    /// for a build that was already considered change nothing. Reports for
    /// a job the split never declared are logged and ignored. Reports after
    /// the join fired are recorded but leave the aggregate unchanged.
    pub fn report_completion(
        &self,
        build: &BuildId,
        job: &JobName,
        result: BuildResult,
        host: &dyn JoinHost,
        log: &dyn BuildLog,
    ) -> bool {
        let mut state = self.state.lock();
        if !state.considered.insert(build.clone()) {
            tracing::debug!(split = %self.split, build = %build, "completion already considered");
            return state.is_complete();
        }
        if *job == state.split_job {
            // The split build itself, reported when it has no downstream jobs
            return state.is_complete();
        }
        if !state.is_declared(job) {
            tracing::warn!(
                split = %self.split,
                job = %job,
                "completion reported for a job the split build did not declare"
            );
            log.line(&format!("[Join] Pending does not contain {}", job));
            return state.is_complete();
        }

        state.observed.entry(job.clone()).or_default().push(result);
        // The aggregate is frozen once the join has fired
        if !state.fired {
            state.aggregate = state.aggregate.combine(result);
        }
        state.pending.shift_remove(job);
        tracing::debug!(
            split = %self.split,
            job = %job,
            %result,
            pending = state.pending.len(),
            "downstream build reported"
        );

        fire_if_ready(&mut state, host, log);
        state.is_complete()
    }

    /// Run the completion check without a new report.
    pub fn check_and_fire(&self, host: &dyn JoinHost, log: &dyn BuildLog) {
        let mut state = self.state.lock();
        fire_if_ready(&mut state, host, log);
    }

    /// Mark `join` as started by this barrier's split build.
    ///
    /// Returns false when it was marked before.
    pub fn claim(&self, join: &JobName) -> bool {
        self.state.lock().claimed.insert(join.clone())
    }
}

fn fire_if_ready(state: &mut JoinState, host: &dyn JoinHost, log: &dyn BuildLog) {
    if state.fired {
        return;
    }
    if !state.pending.is_empty() {
        log.line(&format!(
            "{} still waiting for {} builds to complete",
            state.split(),
            state.pending.len()
        ));
        return;
    }

    let requeued = settle(state);
    if !requeued.is_empty() {
        let names: Vec<&str> = requeued.iter().map(JobName::as_str).collect();
        log.line(&format!(
            "{} still waiting for {} builds to be rebuilt: {}",
            state.split(),
            requeued.len(),
            names.join(", ")
        ));
        return;
    }

    // Every job now has a result meeting the threshold, so the aggregate does too
    log.line("All downstream jobs complete");

    state.fired = true;
    let split = state.split();
    tracing::info!(split = %split, aggregate = %state.aggregate, "join fired");

    for action in &state.post_actions {
        if let Err(e) = host.perform_action(action, &split, log) {
            tracing::warn!(split = %split, action = %action, error = %e, "post action failed");
            log.line(&format!("Post action {} failed: {}", action, e));
        }
    }
    for target in &state.targets {
        log.line(&format!("Scheduling join project: {}", target));
        host.schedule_build(
            target,
            Cause::Join { job: state.split_job.clone(), build: state.split_number },
        );
    }
}

/// Recompute the aggregate from every observed result and put jobs with no
/// acceptable result back into pending.
///
/// A job is acceptable once any of its builds meets the threshold; it then
/// contributes its best result, so a rebuild clears an earlier failure.
/// Returns the requeued jobs.
fn settle(state: &mut JoinState) -> Vec<JobName> {
    let mut aggregate = BuildResult::Success;
    let mut requeued = Vec::new();
    for (job, results) in &state.observed {
        let best = results.iter().min().copied().unwrap_or_default();
        if best.is_better_or_equal(state.threshold) {
            aggregate = aggregate.combine(best);
        } else {
            let worst = results.iter().max().copied().unwrap_or_default();
            aggregate = aggregate.combine(worst);
            requeued.push(job.clone());
        }
    }
    state.aggregate = aggregate;
    state.pending.extend(requeued.iter().cloned());
    requeued
}

#[cfg(test)]
#[path = "barrier_tests.rs"]
mod tests;
