// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes for jobs and builds.

use crate::path;

/// Define a newtype ID wrapper around `SmolStr`.
///
/// Generates `new()`, `as_str()`, `is_empty()`, `Display`, `From<String>`,
/// `From<&str>`, `PartialEq<str>`, `PartialEq<&str>`, `Borrow<str>`, and
/// `Deref` implementations. Identifiers are assigned by the host, so the
/// wrapper never generates values of its own.
///
/// ```ignore
/// define_id! {
///     /// Doc comment for the ID type.
///     pub struct JobName;
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub smol_str::SmolStr);

        impl $name {
            pub fn new(id: impl Into<smol_str::SmolStr>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the ID is an empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&String> for $name {
            fn from(s: &String) -> Self {
                Self::new(s.as_str())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Full namespace path of a job, e.g. `"folder/sub/job"`.
    ///
    /// Never carries a leading separator; the root namespace is the empty
    /// string.
    pub struct JobName;
}

define_id! {
    /// Identity of a single build, formatted as `{job}#{number}`.
    ///
    /// Used for deduplicating completion reports, so two builds of the same
    /// job always carry distinct identities.
    pub struct BuildId;
}

impl JobName {
    /// Namespace that contains this job (`""` for top-level jobs).
    pub fn parent(&self) -> &str {
        path::split_full_name(self.as_str()).0
    }

    /// Last segment of the full name.
    pub fn short_name(&self) -> &str {
        path::split_full_name(self.as_str()).1
    }
}

impl BuildId {
    pub fn of(job: &JobName, number: u64) -> Self {
        Self::new(format!("{}#{}", job, number))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
