// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job catalog: the host's job configuration as the join subsystem sees it.
//!
//! Stored as TOML, one `[[job]]` table per job:
//!
//! ```toml
//! [[job]]
//! name = "team/split"
//! next = "a, b"
//!
//! [job.join]
//! projects = "deploy"
//! threshold = "unstable"
//! ```

use crate::host::{Downstream, DownstreamSource, TriggerKind};
use indexmap::IndexMap;
use joinery_core::{path, JobDef, JobName, PathError, ReferenceList};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },

    #[error("invalid job catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to encode job catalog: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("no such job: {0}")]
    UnknownJob(JobName),

    #[error("job already exists: {0}")]
    AlreadyExists(JobName),
}

/// Why a reference list cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No such project: {0}")]
    UnknownJob(String),

    #[error("Not buildable: {0}")]
    NotBuildable(String),

    #[error(transparent)]
    Path(#[from] PathError),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "job")]
    jobs: Vec<JobDef>,
}

/// All known jobs, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    jobs: IndexMap<JobName, JobDef>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_jobs(jobs: impl IntoIterator<Item = JobDef>) -> Self {
        let mut catalog = Self::new();
        for job in jobs {
            catalog.insert(job);
        }
        catalog
    }

    pub fn from_toml(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        Ok(Self::from_jobs(file.jobs))
    }

    pub fn to_toml(&self) -> Result<String, CatalogError> {
        let file = CatalogFile { jobs: self.jobs.values().cloned().collect() };
        Ok(toml::to_string_pretty(&file)?)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| CatalogError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&text)
    }

    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let text = self.to_toml()?;
        std::fs::write(path, text)
            .map_err(|source| CatalogError::Write { path: path.to_path_buf(), source })
    }

    /// Add or replace a job. Returns the previous definition.
    pub fn insert(&mut self, job: JobDef) -> Option<JobDef> {
        self.jobs.insert(job.name.clone(), job)
    }

    pub fn get(&self, name: &str) -> Option<&JobDef> {
        self.jobs.get(name)
    }

    pub fn jobs(&self) -> impl Iterator<Item = &JobDef> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Jobs named by `refs`, resolved against `context`.
    ///
    /// References that do not canonicalize or name no job are logged and
    /// skipped.
    pub fn resolve(&self, context: &str, refs: &ReferenceList) -> Vec<&JobDef> {
        let mut jobs = Vec::new();
        for reference in refs {
            let name = match reference.resolve(context) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(context, reference = %reference, error = %e, "unresolvable job reference");
                    continue;
                }
            };
            match self.jobs.get(name.as_str()) {
                Some(job) => jobs.push(job),
                None => {
                    tracing::debug!(context, reference = %reference, "reference names no job")
                }
            }
        }
        jobs
    }

    /// Join targets of `job`, resolved against its parent namespace.
    pub fn join_targets(&self, job: &JobDef) -> Vec<JobName> {
        match &job.join {
            Some(join) => {
                self.resolve(job.context(), &join.targets).into_iter().map(|j| j.name.clone()).collect()
            }
            None => Vec::new(),
        }
    }

    /// Check every token of `refs` names a buildable job.
    ///
    /// Reports the first failing token.
    pub fn check_references(
        &self,
        context: &str,
        refs: &ReferenceList,
    ) -> Result<(), ValidationError> {
        for reference in refs {
            let name = reference.resolve(context)?;
            match self.jobs.get(name.as_str()) {
                None => return Err(ValidationError::UnknownJob(reference.to_string())),
                Some(job) if !job.buildable => {
                    return Err(ValidationError::NotBuildable(reference.to_string()))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Validate the join configuration of every job.
    pub fn validate(&self) -> Vec<(JobName, ValidationError)> {
        let mut errors = Vec::new();
        for job in self.jobs.values() {
            let Some(join) = &job.join else { continue };
            let lists = std::iter::once(&join.targets)
                .chain(join.parameterized.iter().map(|t| &t.projects));
            for refs in lists {
                if let Err(e) = self.check_references(job.context(), refs) {
                    errors.push((job.name.clone(), e));
                }
            }
        }
        errors
    }

    /// Rename `old` to `new` within namespace `parent` and rewrite every
    /// stored reference to it.
    ///
    /// Renaming a folder moves every job beneath it. Returns the jobs whose
    /// definition changed, under their new names.
    pub fn rename_job(
        &mut self,
        parent: &str,
        old: &str,
        new: &str,
    ) -> Result<Vec<JobName>, CatalogError> {
        let old_full = path::full_name(parent, old);
        let new_full = path::full_name(parent, new);
        if old_full == new_full {
            return Ok(Vec::new());
        }
        if self.jobs.contains_key(new_full.as_str()) {
            return Err(CatalogError::AlreadyExists(JobName::new(new_full)));
        }
        // Moved jobs must not land on a job that stays where it is
        for name in self.jobs.keys() {
            let Some(rest) = path::strip_path_prefix(name, &old_full) else {
                continue;
            };
            let moved = format!("{}{}", new_full, rest);
            if path::strip_path_prefix(&moved, &old_full).is_none()
                && self.jobs.contains_key(moved.as_str())
            {
                return Err(CatalogError::AlreadyExists(JobName::new(moved)));
            }
        }

        let mut changed = Vec::new();
        let mut renamed_any = false;
        let jobs = std::mem::take(&mut self.jobs);
        for (name, mut job) in jobs {
            if let Some(rest) = path::strip_path_prefix(&name, &old_full) {
                job.name = JobName::new(format!("{}{}", new_full, rest));
                renamed_any = true;
            }
            let context = job.context().to_string();
            let mut rewritten = false;
            for list in job.reference_lists_mut() {
                rewritten |= list.rename(&old_full, &new_full, &context);
            }
            if rewritten || job.name != name {
                changed.push(job.name.clone());
            }
            self.jobs.insert(job.name.clone(), job);
        }

        if !renamed_any {
            tracing::debug!(old = %old_full, new = %new_full, "renamed item is not a cataloged job");
        }
        Ok(changed)
    }
}

impl DownstreamSource for Catalog {
    fn downstream(&self, job: &JobName) -> Vec<Downstream> {
        let Some(def) = self.jobs.get(job) else {
            return Vec::new();
        };
        let context = def.context();
        let mut found = Vec::new();
        let mut push = |refs: &ReferenceList, via: TriggerKind| {
            for target in self.resolve(context, refs) {
                found.push(Downstream { name: target.name.clone(), disabled: target.disabled, via });
            }
        };
        push(&def.next, TriggerKind::Next);
        for trigger in &def.parameterized {
            push(&trigger.projects, TriggerKind::Parameterized(trigger.condition));
        }
        for trigger in &def.conditional {
            push(&trigger.projects, TriggerKind::Conditional(trigger.condition));
        }
        for trigger in &def.extended {
            push(&trigger.projects, TriggerKind::Extended(trigger.condition));
        }
        found
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
