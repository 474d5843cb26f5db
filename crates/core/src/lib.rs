// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! joinery-core: data model and path resolution for split/join job fan-in

pub mod macros;

pub mod build;
pub mod id;
pub mod job;
pub mod join;
pub mod path;
pub mod reference;
pub mod result;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use build::{Build, Cause};
pub use id::{BuildId, JobName};
#[cfg(any(test, feature = "test-support"))]
pub use job::JobDefBuilder;
pub use job::{JobDef, JoinConfig, TriggerConfig};
pub use join::JoinState;
pub use path::{canonicalize, rewrite_after_rename, rewrite_reference_list, PathError};
pub use reference::{reformat, PathReference, ReferenceList};
pub use result::{BuildResult, ParseResultError, TriggerCondition};
