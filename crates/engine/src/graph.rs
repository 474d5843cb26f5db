// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Join edges derived from the job catalog.
//!
//! The graph is rebuilt wholesale whenever the catalog changes and never
//! mutated afterwards.

use crate::catalog::Catalog;
use crate::edge::{Delegate, DependencyEdge, EdgeCondition};
use crate::host::DownstreamSource;
use indexmap::{IndexMap, IndexSet};
use joinery_core::JobName;

#[derive(Debug, Default)]
pub struct DependencyGraph {
    edges: IndexMap<JobName, Vec<DependencyEdge>>,
}

impl DependencyGraph {
    pub fn build(catalog: &Catalog) -> Self {
        let mut graph = Self::default();
        for split in catalog.jobs() {
            let Some(join) = &split.join else { continue };

            let mut upstream: IndexSet<JobName> =
                catalog.downstream(&split.name).into_iter().map(|d| d.name).collect();
            if upstream.is_empty() {
                upstream.insert(split.name.clone());
            }

            let threshold = join.resolved_threshold();
            let targets = catalog.join_targets(split);
            let mut predicated = Vec::new();
            for trigger in &join.parameterized {
                for target in catalog.resolve(split.context(), &trigger.projects) {
                    predicated.push((target.name.clone(), trigger.condition));
                }
            }

            for job in &upstream {
                for target in &targets {
                    graph.add(DependencyEdge::new(
                        job.clone(),
                        target.clone(),
                        split.name.clone(),
                        EdgeCondition::ResultThreshold(threshold),
                    ));
                }
                for (target, condition) in &predicated {
                    graph.add(
                        DependencyEdge::new(
                            job.clone(),
                            target.clone(),
                            split.name.clone(),
                            EdgeCondition::Predicate((*condition).into()),
                        )
                        .with_delegate(Delegate::Parameterized(*condition)),
                    );
                }
            }
        }
        tracing::debug!(edges = graph.len(), "dependency graph rebuilt");
        graph
    }

    fn add(&mut self, edge: DependencyEdge) {
        self.edges.entry(edge.upstream.clone()).or_default().push(edge);
    }

    /// Edges whose upstream end is `job`.
    pub fn edges_from(&self, job: &JobName) -> &[DependencyEdge] {
        self.edges.get(job).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.values().flatten()
    }

    /// Total number of edges.
    pub fn len(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
