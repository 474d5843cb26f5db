// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job configuration as seen by the join subsystem.

use crate::id::JobName;
use crate::reference::ReferenceList;
use crate::result::{BuildResult, TriggerCondition};
use serde::{Deserialize, Serialize};

/// A parameterized trigger: downstream references plus the result
/// condition under which they fire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub projects: ReferenceList,
    #[serde(default)]
    pub condition: TriggerCondition,
}

impl TriggerConfig {
    pub fn new(projects: impl Into<ReferenceList>, condition: TriggerCondition) -> Self {
        Self { projects: projects.into(), condition }
    }
}

/// Join configuration of a split job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinConfig {
    /// Jobs to schedule once every downstream job has finished
    #[serde(default, rename = "projects")]
    pub targets: ReferenceList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<BuildResult>,
    /// Older configurations only carry this flag; it selects `unstable`
    /// as the threshold when no explicit threshold is set.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub even_if_downstream_unstable: bool,
    /// Host actions to run, in order, before the join targets are scheduled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_actions: Vec<String>,
    /// Parameterized triggers fired from the join, each with its own condition
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameterized: Vec<TriggerConfig>,
}

impl JoinConfig {
    pub fn new(targets: impl Into<ReferenceList>) -> Self {
        Self { targets: targets.into(), ..Self::default() }
    }

    crate::setters! {
        set {
            even_if_downstream_unstable: bool,
            post_actions: Vec<String>,
            parameterized: Vec<TriggerConfig>,
        }
        option {
            threshold: BuildResult,
        }
    }

    /// Minimum aggregate result for the join to proceed.
    pub fn resolved_threshold(&self) -> BuildResult {
        match self.threshold {
            Some(threshold) => threshold,
            None if self.even_if_downstream_unstable => BuildResult::Unstable,
            None => BuildResult::Success,
        }
    }
}

fn default_true() -> bool {
    true
}

fn is_true(v: &bool) -> bool {
    *v
}

/// A job and the downstream triggers it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDef {
    pub name: JobName,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    /// False for entries that exist in the namespace but cannot be built
    /// (folders, views)
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub buildable: bool,
    /// Plain "trigger next job" references
    #[serde(default, skip_serializing_if = "ReferenceList::is_empty")]
    pub next: ReferenceList,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameterized: Vec<TriggerConfig>,
    /// Parameterized triggers wrapped in a conditional publisher
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional: Vec<TriggerConfig>,
    /// Extended downstream triggers, gated on this job's own result
    #[serde(default, rename = "downstream_ext", skip_serializing_if = "Vec::is_empty")]
    pub extended: Vec<TriggerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<JoinConfig>,
}

impl JobDef {
    pub fn new(name: impl Into<JobName>) -> Self {
        Self {
            name: name.into(),
            disabled: false,
            buildable: true,
            next: ReferenceList::default(),
            parameterized: Vec::new(),
            conditional: Vec::new(),
            extended: Vec::new(),
            join: None,
        }
    }

    /// Namespace that relative references of this job resolve against.
    pub fn context(&self) -> &str {
        self.name.parent()
    }

    /// Every reference list this job stores, for rename propagation.
    pub fn reference_lists_mut(&mut self) -> Vec<&mut ReferenceList> {
        let mut lists = vec![&mut self.next];
        lists.extend(self.parameterized.iter_mut().map(|t| &mut t.projects));
        lists.extend(self.conditional.iter_mut().map(|t| &mut t.projects));
        lists.extend(self.extended.iter_mut().map(|t| &mut t.projects));
        if let Some(join) = self.join.as_mut() {
            lists.push(&mut join.targets);
            lists.extend(join.parameterized.iter_mut().map(|t| &mut t.projects));
        }
        lists
    }
}

crate::builder! {
    pub struct JobDefBuilder => JobDef {
        into {
            name: JobName = "job",
            next: ReferenceList = "",
        }
        set {
            disabled: bool = false,
            buildable: bool = true,
            parameterized: Vec<TriggerConfig> = Vec::new(),
            conditional: Vec<TriggerConfig> = Vec::new(),
            extended: Vec<TriggerConfig> = Vec::new(),
        }
        option {
            join: JoinConfig = None,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
