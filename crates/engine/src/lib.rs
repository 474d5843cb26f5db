// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! joinery-engine: completion barriers, dependency edges, and the join
//! coordinator

pub mod barrier;
pub mod catalog;
pub mod edge;
mod engine;
pub mod graph;
pub mod host;
pub mod log;
pub mod registry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use barrier::{CompletionBarrier, JoinSpec};
pub use catalog::{Catalog, CatalogError, ValidationError};
pub use edge::{Delegate, DependencyEdge, EdgeCondition, EdgeContext, ResultPredicate, Verdict};
pub use engine::JoinEngine;
pub use graph::DependencyGraph;
pub use host::{ActionError, BuildLookup, Downstream, DownstreamSource, JoinHost, TriggerKind};
pub use log::{BuildLog, BuildLogger, MemoryLog, TracingLog};
pub use registry::BarrierRegistry;
