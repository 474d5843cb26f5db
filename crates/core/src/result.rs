// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build results and their ordering.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Outcome of a finished build.
///
/// Variants are declared best to worst, so the derived `Ord` is the
/// aggregation order: `Success < Unstable < Failure < Aborted`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BuildResult {
    #[default]
    Success,
    Unstable,
    Failure,
    Aborted,
}

impl BuildResult {
    /// Worst of the two results.
    pub fn combine(self, other: BuildResult) -> BuildResult {
        self.max(other)
    }

    pub fn is_worse_than(self, other: BuildResult) -> bool {
        self > other
    }

    /// True when this result satisfies `threshold`.
    pub fn is_better_or_equal(self, threshold: BuildResult) -> bool {
        self <= threshold
    }
}

crate::simple_display! {
    BuildResult {
        Success => "success",
        Unstable => "unstable",
        Failure => "failure",
        Aborted => "aborted",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown build result `{0}` (expected success, unstable, failure or aborted)")]
pub struct ParseResultError(pub String);

impl FromStr for BuildResult {
    type Err = ParseResultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(BuildResult::Success),
            "unstable" => Ok(BuildResult::Unstable),
            "failure" | "failed" => Ok(BuildResult::Failure),
            "aborted" => Ok(BuildResult::Aborted),
            _ => Err(ParseResultError(s.to_string())),
        }
    }
}

/// Result condition attached to a parameterized trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    #[default]
    Success,
    Unstable,
    UnstableOrBetter,
    UnstableOrWorse,
    Failed,
    Always,
}

impl TriggerCondition {
    pub fn is_met(self, result: BuildResult) -> bool {
        match self {
            TriggerCondition::Success => result == BuildResult::Success,
            TriggerCondition::Unstable => result == BuildResult::Unstable,
            TriggerCondition::UnstableOrBetter => result.is_better_or_equal(BuildResult::Unstable),
            TriggerCondition::UnstableOrWorse => result >= BuildResult::Unstable,
            TriggerCondition::Failed => result == BuildResult::Failure,
            TriggerCondition::Always => true,
        }
    }
}

crate::simple_display! {
    TriggerCondition {
        Success => "success",
        Unstable => "unstable",
        UnstableOrBetter => "unstable_or_better",
        UnstableOrWorse => "unstable_or_worse",
        Failed => "failed",
        Always => "always",
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
