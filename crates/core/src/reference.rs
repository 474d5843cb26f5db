// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed job-reference lists.
//!
//! Persisted configuration stores job references as one comma-separated
//! string (`"join, ../deploy, /ops/notify"`). It is parsed once into a
//! [`ReferenceList`] and only turned back into a string for storage or for
//! the rename rewrite in [`crate::path`].

use crate::path::{self, PathError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A relative (`"../job"`) or absolute (`"/folder/job"`) job reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathReference(String);

impl PathReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_absolute(&self) -> bool {
        self.0.starts_with(path::SEPARATOR)
    }

    /// Full name of the referenced job, seen from `context`.
    pub fn resolve(&self, context: &str) -> Result<String, PathError> {
        path::canonicalize(context, &self.0)
    }
}

impl fmt::Display for PathReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered list of job references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceList(Vec<PathReference>);

impl ReferenceList {
    pub fn parse(value: &str) -> Self {
        Self(
            value
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(PathReference::new)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathReference> {
        self.0.iter()
    }

    /// Rewrite references after the job at `old_full` moved to `new_full`.
    ///
    /// `context` is the namespace the references are relative to. Returns
    /// true when any reference changed.
    pub fn rename(&mut self, old_full: &str, new_full: &str, context: &str) -> bool {
        let (value, changed) =
            path::rewrite_reference_list(old_full, new_full, &self.to_string(), context);
        if changed {
            *self = Self::parse(&value);
        }
        changed
    }
}

/// Normalize a user-entered list: trim tokens, drop empty ones, and join
/// them with `", "`. Trailing commas left by autocompletion disappear.
pub fn reformat(value: &str) -> String {
    ReferenceList::parse(value).to_string()
}

impl fmt::Display for ReferenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, reference) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(reference.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for ReferenceList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for ReferenceList {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a ReferenceList {
    type Item = &'a PathReference;
    type IntoIter = std::slice::Iter<'a, PathReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for ReferenceList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ReferenceList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

#[cfg(test)]
#[path = "reference_tests.rs"]
mod tests;
