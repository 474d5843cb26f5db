// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::barrier::JoinSpec;
use crate::host::{Downstream, TriggerKind};
use crate::log::MemoryLog;
use crate::test_support::FakeHost;
use joinery_core::test_support::{downstream_build, user_build};
use joinery_core::{BuildId, Cause};
use yare::parameterized;

struct Fixture {
    host: FakeHost,
    barriers: BarrierRegistry,
    log: MemoryLog,
}

impl Fixture {
    /// Split build `split#number` with a barrier over `names`.
    fn new(number: u64, names: &[&str]) -> Self {
        let fixture =
            Self { host: FakeHost::new(), barriers: BarrierRegistry::new(), log: MemoryLog::new() };
        fixture.add_split(number, names, BuildResult::Success);
        fixture
    }

    fn add_split(&self, number: u64, names: &[&str], result: BuildResult) {
        let split = user_build("split", number, result);
        self.host.record(&split);
        let downstream: Vec<Downstream> = names
            .iter()
            .map(|n| Downstream { name: JobName::new(*n), disabled: false, via: TriggerKind::Next })
            .collect();
        self.barriers.get_or_insert_with(&split.id, || {
            CompletionBarrier::new(&split.job, number, &downstream, JoinSpec::default())
        });
    }

    fn ctx(&self) -> EdgeContext<'_> {
        EdgeContext { builds: &self.host, barriers: &self.barriers, host: &self.host, log: &self.log }
    }
}

fn edge(upstream: &str, condition: EdgeCondition) -> DependencyEdge {
    DependencyEdge::new(upstream, "join", "split", condition)
}

#[test]
fn waits_then_triggers_when_fan_out_closes() {
    let f = Fixture::new(1, &["a", "b"]);
    let a = downstream_build("a", 1, BuildResult::Success, "split", 1);
    let b = downstream_build("b", 1, BuildResult::Success, "split", 1);

    assert!(matches!(edge("a", EdgeCondition::Unconditional).evaluate(&a, &f.ctx()), Verdict::Waiting));
    let verdict = edge("b", EdgeCondition::Unconditional).evaluate(&b, &f.ctx());

    let Verdict::Trigger { split, barrier } = verdict else {
        panic!("expected trigger, got {:?}", verdict);
    };
    assert_eq!(split.id, BuildId::new("split#1"));
    assert!(barrier.has_fired());
    assert!(f.log.contains("Notifying upstream build split#1 of job completion"));
}

#[test]
fn split_job_finishing_is_its_own_split_build() {
    let f = Fixture::new(4, &[]);
    let split = user_build("split", 4, BuildResult::Success);

    let e = DependencyEdge::new("split", "join", "split", EdgeCondition::Unconditional);
    assert!(e.should_trigger_join(&split, &f.ctx()));
}

#[test]
fn join_cause_is_skipped_in_favor_of_genuine_upstream() {
    let f = Fixture::new(1, &["a"]);
    f.add_split(2, &["a"], BuildResult::Success);
    let a = Build::new("a", 9, BuildResult::Success)
        .caused_by(Cause::Join { job: JobName::new("split"), build: 1 })
        .caused_by(Cause::Upstream { job: JobName::new("split"), build: 2 });

    let verdict = edge("a", EdgeCondition::Unconditional).evaluate(&a, &f.ctx());

    let Verdict::Trigger { split, .. } = verdict else {
        panic!("expected trigger, got {:?}", verdict);
    };
    assert_eq!(split.number, 2);
    assert!(!f.barriers.get(&BuildId::new("split#1")).unwrap().is_complete());
}

#[test]
fn unresolvable_split_build_leaves_barrier_untouched() {
    let f = Fixture::new(1, &["a"]);
    let orphan = user_build("a", 1, BuildResult::Success);
    let unknown = downstream_build("a", 2, BuildResult::Success, "split", 99);

    assert!(matches!(
        edge("a", EdgeCondition::Unconditional).evaluate(&orphan, &f.ctx()),
        Verdict::Unresolved
    ));
    assert!(matches!(
        edge("a", EdgeCondition::Unconditional).evaluate(&unknown, &f.ctx()),
        Verdict::Unresolved
    ));
    assert_eq!(f.barriers.get(&BuildId::new("split#1")).unwrap().pending().len(), 1);
    assert!(f.log.lines().is_empty());
}

#[test]
fn split_build_without_barrier_is_unresolved() {
    let f = Fixture::new(1, &["a"]);
    f.host.record(&user_build("split", 5, BuildResult::Success));
    let a = downstream_build("a", 1, BuildResult::Success, "split", 5);

    assert!(matches!(
        edge("a", EdgeCondition::Unconditional).evaluate(&a, &f.ctx()),
        Verdict::Unresolved
    ));
}

#[test]
fn predicate_decline_still_reports_completion() {
    let f = Fixture::new(1, &["a"]);
    let a = downstream_build("a", 1, BuildResult::Unstable, "split", 1);
    let only_failures = ResultPredicate::new("failures", |r| r == BuildResult::Failure);

    let verdict = edge("a", EdgeCondition::Predicate(only_failures)).evaluate(&a, &f.ctx());

    assert!(matches!(verdict, Verdict::Declined));
    assert!(f.barriers.get(&BuildId::new("split#1")).unwrap().is_complete());
}

#[test]
fn parameterized_delegate_checks_split_result() {
    let f = Fixture::new(1, &["a"]);
    let a = downstream_build("a", 1, BuildResult::Success, "split", 1);

    let e = edge("a", EdgeCondition::Unconditional)
        .with_delegate(Delegate::Parameterized(TriggerCondition::Failed));

    assert!(!e.should_trigger_join(&a, &f.ctx()));
}

#[parameterized(
    unconditional = { EdgeCondition::Unconditional, BuildResult::Aborted, true },
    threshold_met = { EdgeCondition::ResultThreshold(BuildResult::Unstable), BuildResult::Unstable, true },
    threshold_missed = { EdgeCondition::ResultThreshold(BuildResult::Unstable), BuildResult::Failure, false },
    predicate_met = { EdgeCondition::Predicate(TriggerCondition::UnstableOrWorse.into()), BuildResult::Failure, true },
    predicate_missed = { EdgeCondition::Predicate(TriggerCondition::UnstableOrWorse.into()), BuildResult::Success, false },
)]
fn edge_condition_against_aggregate(condition: EdgeCondition, aggregate: BuildResult, met: bool) {
    assert_eq!(condition.is_met(aggregate), met);
}

#[test]
fn only_threshold_edges_are_scheduled_by_barrier() {
    assert!(EdgeCondition::ResultThreshold(BuildResult::Success).is_scheduled_by_barrier());
    assert!(!EdgeCondition::Unconditional.is_scheduled_by_barrier());
    assert!(!EdgeCondition::Predicate(TriggerCondition::Always.into()).is_scheduled_by_barrier());
}

#[test]
fn predicate_debug_shows_label() {
    let predicate = ResultPredicate::from(TriggerCondition::UnstableOrBetter);
    assert_eq!(predicate.label(), TriggerCondition::UnstableOrBetter.to_string());
    assert!(format!("{:?}", predicate).contains(predicate.label()));
}
