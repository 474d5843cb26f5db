// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live barriers keyed by split build.

use crate::barrier::CompletionBarrier;
use joinery_core::{BuildId, JoinState};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct BarrierRegistry {
    barriers: RwLock<HashMap<BuildId, Arc<CompletionBarrier>>>,
}

impl BarrierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, split: &BuildId) -> Option<Arc<CompletionBarrier>> {
        self.barriers.read().get(split).cloned()
    }

    /// Register the barrier built by `make` unless the split build already
    /// has one. Returns the registered barrier and whether it is new.
    pub fn get_or_insert_with(
        &self,
        split: &BuildId,
        make: impl FnOnce() -> CompletionBarrier,
    ) -> (Arc<CompletionBarrier>, bool) {
        let mut barriers = self.barriers.write();
        if let Some(existing) = barriers.get(split) {
            return (Arc::clone(existing), false);
        }
        let barrier = Arc::new(make());
        barriers.insert(split.clone(), Arc::clone(&barrier));
        (barrier, true)
    }

    pub fn remove(&self, split: &BuildId) -> Option<Arc<CompletionBarrier>> {
        self.barriers.write().remove(split)
    }

    pub fn len(&self) -> usize {
        self.barriers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.barriers.read().is_empty()
    }

    /// State of every barrier, ordered by split build.
    pub fn snapshot(&self) -> Vec<JoinState> {
        let mut states: Vec<JoinState> =
            self.barriers.read().values().map(|b| b.snapshot()).collect();
        states.sort_by(|a, b| a.split_job.cmp(&b.split_job).then(a.split_number.cmp(&b.split_number)));
        states
    }

    /// Replace all barriers with the given persisted states.
    pub fn restore(&self, states: impl IntoIterator<Item = JoinState>) {
        let restored: HashMap<BuildId, Arc<CompletionBarrier>> = states
            .into_iter()
            .map(|state| {
                let barrier = CompletionBarrier::restore(state);
                (barrier.split().clone(), Arc::new(barrier))
            })
            .collect();
        *self.barriers.write() = restored;
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
