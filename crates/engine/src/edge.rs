// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency edges from a downstream job to a join job.
//!
//! Every finished downstream build is offered to the edges leaving its job.
//! The edge finds the split build that started it, reports the completion
//! to that split's barrier, and answers whether the join should start.

use crate::barrier::CompletionBarrier;
use crate::host::{BuildLookup, JoinHost};
use crate::log::BuildLog;
use crate::registry::BarrierRegistry;
use joinery_core::{Build, BuildResult, JobName, TriggerCondition};
use std::fmt;
use std::sync::Arc;

/// Named test on the aggregate result.
#[derive(Clone)]
pub struct ResultPredicate {
    label: String,
    check: Arc<dyn Fn(BuildResult) -> bool + Send + Sync>,
}

impl ResultPredicate {
    pub fn new(
        label: impl Into<String>,
        check: impl Fn(BuildResult) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self { label: label.into(), check: Arc::new(check) }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn test(&self, result: BuildResult) -> bool {
        (self.check)(result)
    }
}

impl From<TriggerCondition> for ResultPredicate {
    fn from(condition: TriggerCondition) -> Self {
        Self::new(condition.to_string(), move |result| condition.is_met(result))
    }
}

impl fmt::Debug for ResultPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResultPredicate").field(&self.label).finish()
    }
}

/// When an edge lets the join start, given the barrier's aggregate.
#[derive(Debug, Clone)]
pub enum EdgeCondition {
    Unconditional,
    /// Aggregate must be this result or better
    ResultThreshold(BuildResult),
    Predicate(ResultPredicate),
}

impl EdgeCondition {
    pub fn is_met(&self, aggregate: BuildResult) -> bool {
        match self {
            EdgeCondition::Unconditional => true,
            EdgeCondition::ResultThreshold(threshold) => aggregate.is_better_or_equal(*threshold),
            EdgeCondition::Predicate(predicate) => predicate.test(aggregate),
        }
    }

    /// True for edges whose join target the barrier schedules when it fires.
    pub fn is_scheduled_by_barrier(&self) -> bool {
        matches!(self, EdgeCondition::ResultThreshold(_))
    }
}

/// Extra gate on the split build itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegate {
    Plain,
    /// The split build's own result must satisfy the condition
    Parameterized(TriggerCondition),
}

impl Delegate {
    pub fn should_trigger(&self, split: &Build) -> bool {
        match self {
            Delegate::Plain => true,
            Delegate::Parameterized(condition) => condition.is_met(split.result),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DependencyEdge {
    /// Downstream job whose completion is reported
    pub upstream: JobName,
    pub join: JobName,
    /// Job owning the barrier
    pub split: JobName,
    pub condition: EdgeCondition,
    pub delegate: Delegate,
}

/// What evaluating an edge for one finished build decided.
#[derive(Debug, Clone)]
pub enum Verdict {
    /// No split build (or no barrier for it) could be found
    Unresolved,
    /// The barrier is still waiting for other downstream jobs
    Waiting,
    /// The fan-out closed but this edge's condition was not met
    Declined,
    Trigger { split: Build, barrier: Arc<CompletionBarrier> },
}

impl Verdict {
    pub fn is_trigger(&self) -> bool {
        matches!(self, Verdict::Trigger { .. })
    }
}

/// Host services an edge needs while evaluating.
pub struct EdgeContext<'a> {
    pub builds: &'a dyn BuildLookup,
    pub barriers: &'a BarrierRegistry,
    pub host: &'a dyn JoinHost,
    pub log: &'a dyn BuildLog,
}

impl DependencyEdge {
    pub fn new(
        upstream: impl Into<JobName>,
        join: impl Into<JobName>,
        split: impl Into<JobName>,
        condition: EdgeCondition,
    ) -> Self {
        Self {
            upstream: upstream.into(),
            join: join.into(),
            split: split.into(),
            condition,
            delegate: Delegate::Plain,
        }
    }

    pub fn with_delegate(mut self, delegate: Delegate) -> Self {
        self.delegate = delegate;
        self
    }

    /// Report `finished` to its split build's barrier and decide.
    pub fn evaluate(&self, finished: &Build, ctx: &EdgeContext<'_>) -> Verdict {
        let Some(split) = self.split_build(finished, ctx.builds) else {
            tracing::debug!(
                build = %finished.id,
                split_job = %self.split,
                "no split build among the causes"
            );
            return Verdict::Unresolved;
        };
        let Some(barrier) = ctx.barriers.get(&split.id) else {
            tracing::debug!(split = %split.id, "split build has no join barrier");
            return Verdict::Unresolved;
        };

        ctx.log.line(&format!("Notifying upstream build {} of job completion", split.id));
        let all_done = barrier.report_completion(
            &finished.id,
            &finished.job,
            finished.result,
            ctx.host,
            ctx.log,
        );
        if !all_done {
            return Verdict::Waiting;
        }
        if self.condition.is_met(barrier.aggregate()) && self.delegate.should_trigger(&split) {
            Verdict::Trigger { split, barrier }
        } else {
            Verdict::Declined
        }
    }

    /// Shorthand for `evaluate(..).is_trigger()`.
    pub fn should_trigger_join(&self, finished: &Build, ctx: &EdgeContext<'_>) -> bool {
        self.evaluate(finished, ctx).is_trigger()
    }

    /// The split build `finished` belongs to: itself when the split job
    /// has no downstream, otherwise the first genuine upstream cause naming
    /// the split job.
    fn split_build(&self, finished: &Build, builds: &dyn BuildLookup) -> Option<Build> {
        if finished.job == self.split {
            return Some(finished.clone());
        }
        finished
            .upstream_causes()
            .filter(|(job, _)| **job == self.split)
            .find_map(|(job, number)| builds.build(job, number))
    }
}

#[cfg(test)]
#[path = "edge_tests.rs"]
mod tests;
