// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interfaces the orchestration host provides to the join subsystem.

use crate::log::BuildLog;
use joinery_core::{Build, BuildId, Cause, JobName, TriggerCondition};
use thiserror::Error;

/// Failure of a host post action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("unknown post action: {0}")]
    Unknown(String),

    #[error("post action {action} failed: {message}")]
    Failed { action: String, message: String },
}

/// Side effects the join subsystem asks the host to perform.
///
/// Both calls happen while the barrier of the split build is locked, so
/// implementations must be quick and must not report completions back into
/// the same barrier.
pub trait JoinHost: Send + Sync {
    /// Run the named post action for a split build whose join succeeded.
    fn perform_action(
        &self,
        action: &str,
        split: &BuildId,
        log: &dyn BuildLog,
    ) -> Result<(), ActionError>;

    /// Queue a build of `job`.
    fn schedule_build(&self, job: &JobName, cause: Cause);
}

/// Read access to the host's build records.
pub trait BuildLookup: Send + Sync {
    fn build(&self, job: &JobName, number: u64) -> Option<Build>;
}

/// The declaration a downstream job was found through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Next,
    Parameterized(TriggerCondition),
    Conditional(TriggerCondition),
    Extended(TriggerCondition),
}

/// One job a split job declares as downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downstream {
    pub name: JobName,
    pub disabled: bool,
    pub via: TriggerKind,
}

/// Enumerates the downstream jobs a job currently declares, across every
/// trigger mechanism.
pub trait DownstreamSource {
    fn downstream(&self, job: &JobName) -> Vec<Downstream>;
}
