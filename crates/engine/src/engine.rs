// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Join coordinator wiring the catalog, graph, and barriers to a host.

use crate::barrier::{CompletionBarrier, JoinSpec};
use crate::catalog::{Catalog, CatalogError};
use crate::edge::{EdgeContext, Verdict};
use crate::graph::DependencyGraph;
use crate::host::{BuildLookup, DownstreamSource, JoinHost};
use crate::log::BuildLog;
use crate::registry::BarrierRegistry;
use joinery_core::{Build, BuildId, Cause, JobName, JoinState};
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

/// Entry point for the host's build lifecycle events.
///
/// The host calls [`split_performed`](Self::split_performed) when a split
/// build runs its join step and [`build_completed`](Self::build_completed)
/// for every finished build. Both may be called from any thread.
pub struct JoinEngine<H> {
    host: H,
    catalog: RwLock<Catalog>,
    graph: RwLock<Arc<DependencyGraph>>,
    barriers: BarrierRegistry,
}

impl<H: JoinHost + BuildLookup> JoinEngine<H> {
    pub fn new(catalog: Catalog, host: H) -> Self {
        let graph = Arc::new(DependencyGraph::build(&catalog));
        Self {
            host,
            catalog: RwLock::new(catalog),
            graph: RwLock::new(graph),
            barriers: BarrierRegistry::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn barriers(&self) -> &BarrierRegistry {
        &self.barriers
    }

    pub fn catalog(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read()
    }

    /// The current graph generation.
    pub fn graph(&self) -> Arc<DependencyGraph> {
        Arc::clone(&self.graph.read())
    }

    /// Replace the catalog and rebuild the graph.
    pub fn set_catalog(&self, catalog: Catalog) {
        *self.catalog.write() = catalog;
        self.rebuild_graph();
    }

    pub fn rebuild_graph(&self) {
        let graph = Arc::new(DependencyGraph::build(&self.catalog.read()));
        *self.graph.write() = graph;
    }

    /// The split build ran its join step: create its barrier.
    ///
    /// Returns `None` when the build's job has no join configuration. Calling
    /// this twice for the same build keeps the first barrier.
    pub fn split_performed(
        &self,
        build: &Build,
        log: &dyn BuildLog,
    ) -> Option<Arc<CompletionBarrier>> {
        let catalog = self.catalog.read();
        let job = catalog.get(&build.job)?;
        let join = job.join.as_ref()?;

        let (barrier, created) = self.barriers.get_or_insert_with(&build.id, || {
            let downstream = catalog.downstream(&build.job);
            let spec = JoinSpec {
                targets: catalog.join_targets(job),
                threshold: join.resolved_threshold(),
                post_actions: join.post_actions.clone(),
            };
            CompletionBarrier::new(&build.job, build.number, &downstream, spec)
        });
        drop(catalog);

        if created {
            tracing::info!(
                split = %build.id,
                pending = barrier.pending().len(),
                "join barrier created"
            );
            barrier.check_and_fire(&self.host, log);
        }
        Some(barrier)
    }

    /// Offer a finished build to every edge leaving its job.
    ///
    /// Returns the join jobs whose edges answered "go". Joins gated only by
    /// the barrier's threshold were already scheduled by the barrier; the
    /// rest are scheduled here, once per split build.
    pub fn build_completed(&self, build: &Build, log: &dyn BuildLog) -> Vec<JobName> {
        let graph = self.graph();
        let ctx = EdgeContext {
            builds: &self.host,
            barriers: &self.barriers,
            host: &self.host,
            log,
        };

        let mut triggered = Vec::new();
        for edge in graph.edges_from(&build.job) {
            let Verdict::Trigger { split, barrier } = edge.evaluate(build, &ctx) else {
                continue;
            };
            if !edge.condition.is_scheduled_by_barrier() && barrier.claim(&edge.join) {
                log.line(&format!("Triggering {} after join of {}", edge.join, split.id));
                self.host.schedule_build(
                    &edge.join,
                    Cause::Join { job: split.job.clone(), build: split.number },
                );
            }
            triggered.push(edge.join.clone());
        }
        triggered
    }

    /// The host renamed `old` to `new` inside namespace `parent`.
    ///
    /// Returns the jobs whose configuration changed and must be persisted.
    pub fn job_renamed(
        &self,
        parent: &str,
        old: &str,
        new: &str,
    ) -> Result<Vec<JobName>, CatalogError> {
        let changed = self.catalog.write().rename_job(parent, old, new)?;
        if !changed.is_empty() {
            self.rebuild_graph();
        }
        Ok(changed)
    }

    /// Drop the barrier of a split build the host no longer keeps.
    pub fn retire(&self, split: &BuildId) -> bool {
        self.barriers.remove(split).is_some()
    }

    pub fn snapshot(&self) -> Vec<JoinState> {
        self.barriers.snapshot()
    }

    pub fn restore(&self, states: Vec<JoinState>) {
        tracing::info!(barriers = states.len(), "restoring join barriers");
        self.barriers.restore(states);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
