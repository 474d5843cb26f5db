// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Build, BuildResult, Cause, JobName};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core types.
pub mod strategies {
    use crate::result::BuildResult;
    use proptest::prelude::*;

    pub fn arb_build_result() -> impl Strategy<Value = BuildResult> {
        prop_oneof![
            Just(BuildResult::Success),
            Just(BuildResult::Unstable),
            Just(BuildResult::Failure),
            Just(BuildResult::Aborted),
        ]
    }

    /// A short namespace segment that is never `.` or `..`.
    pub fn arb_segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,5}"
    }
}

// ── Build factory functions ─────────────────────────────────────────────

/// Build of `job` started by `split#split_number`.
pub fn downstream_build(
    job: &str,
    number: u64,
    result: BuildResult,
    split: &str,
    split_number: u64,
) -> Build {
    Build::new(job, number, result)
        .caused_by(Cause::Upstream { job: JobName::new(split), build: split_number })
}

/// Build started by hand.
pub fn user_build(job: &str, number: u64, result: BuildResult) -> Build {
    Build::new(job, number, result).caused_by(Cause::User)
}
