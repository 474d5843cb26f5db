// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Namespace path resolution for job references.
//!
//! Job references are stored relative to the namespace of the job that
//! declares them (`"../deploy"`, `"./tests"`, `"sibling"`) or absolute from
//! the root (`"/folder/job"`). These functions are pure and never touch the
//! job catalog.

use thiserror::Error;

/// Namespace separator.
pub const SEPARATOR: char = '/';

const CURRENT: &str = ".";
const PARENT: &str = "..";

/// Errors produced while resolving or rewriting references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// More `..` segments than the context has levels.
    #[error("reference `{reference}` climbs above the root of `{context}`")]
    Underflow { context: String, reference: String },

    /// A rename must keep the number of namespace levels.
    #[error("cannot rewrite `{old}` to `{new}`: paths differ in depth")]
    DepthMismatch { old: String, new: String },
}

/// Resolve `reference` against the `context` namespace into a full name.
///
/// A leading separator makes the reference absolute. `.` is a no-op and `..`
/// moves one level up; climbing above the root is an error.
pub fn canonicalize(context: &str, reference: &str) -> Result<String, PathError> {
    let mut stack: Vec<&str> = context.split(SEPARATOR).filter(|s| !s.is_empty()).collect();
    if reference.starts_with(SEPARATOR) {
        stack.clear();
    }

    for segment in reference.split(SEPARATOR) {
        match segment {
            "" | CURRENT => {}
            PARENT => {
                if stack.pop().is_none() {
                    return Err(PathError::Underflow {
                        context: context.to_string(),
                        reference: reference.to_string(),
                    });
                }
            }
            name => stack.push(name),
        }
    }

    Ok(stack.join("/"))
}

/// Rewrite `reference` after the job at `old_full` moved to `new_full`.
///
/// Walks the reference from its last segment backwards against the old path,
/// replacing each matching literal with the segment of the new path at the
/// same depth. `..` consumes a level without rewriting, `.` and empty
/// segments are kept as they are, and the first literal that does not match
/// stops the rewrite. The relative or absolute encoding of the reference is
/// preserved. An absolute reference that climbs above the root is an error.
pub fn rewrite_after_rename(
    old_full: &str,
    new_full: &str,
    reference: &str,
) -> Result<String, PathError> {
    let old: Vec<&str> = old_full.split(SEPARATOR).collect();
    let new: Vec<&str> = new_full.split(SEPARATOR).collect();
    if old.len() != new.len() {
        return Err(PathError::DepthMismatch {
            old: old_full.to_string(),
            new: new_full.to_string(),
        });
    }

    if reference.starts_with(SEPARATOR) {
        canonicalize("", reference)?;
    }

    // Leading `..` left over once the old path is used up belong to the
    // context the reference is resolved from, which is not known here.
    let mut parts: Vec<&str> = reference.split(SEPARATOR).collect();
    let mut depth = old.len();
    for i in (0..parts.len()).rev() {
        if depth == 0 {
            break;
        }
        let part = parts[i];
        match part {
            "" | CURRENT => {}
            PARENT => depth -= 1,
            literal if literal == old[depth - 1] => {
                parts[i] = new[depth - 1];
                depth -= 1;
            }
            _ => break,
        }
    }

    Ok(parts.join("/"))
}

/// Rewrite every reference in a comma-separated list that points at (or
/// below) `old_full`.
///
/// Each token is trimmed and resolved against `context`. Tokens whose full
/// name is `old_full` or lies underneath it are rewritten with
/// [`rewrite_after_rename`]; everything else passes through unchanged.
/// Tokens that cannot be resolved are left as they are.
///
/// Returns the rewritten list and whether any token changed.
pub fn rewrite_reference_list(
    old_full: &str,
    new_full: &str,
    references: &str,
    context: &str,
) -> (String, bool) {
    let mut changed = false;
    let mut rewritten = Vec::new();

    for token in references.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let canonical = match canonicalize(context, token) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(reference = token, context, error = %e, "leaving unresolvable reference");
                rewritten.push(token.to_string());
                continue;
            }
        };

        let Some(rest) = strip_path_prefix(&canonical, old_full) else {
            rewritten.push(token.to_string());
            continue;
        };

        let new_canonical = format!("{}{}", new_full, rest);
        match rewrite_after_rename(&canonical, &new_canonical, token) {
            Ok(value) => {
                changed |= value != token;
                rewritten.push(value);
            }
            Err(e) => {
                tracing::warn!(reference = token, error = %e, "cannot rewrite reference");
                rewritten.push(token.to_string());
            }
        }
    }

    (rewritten.join(","), changed)
}

/// Split a full name into its parent namespace and short name.
pub fn split_full_name(full: &str) -> (&str, &str) {
    match full.rfind(SEPARATOR) {
        Some(pos) => (&full[..pos], &full[pos + 1..]),
        None => ("", full),
    }
}

/// Join a parent namespace and a short name into a full name.
pub fn full_name(parent: &str, short: &str) -> String {
    if parent.is_empty() {
        short.to_string()
    } else {
        format!("{}/{}", parent, short)
    }
}

/// Returns the remainder of `full` after `prefix` when `prefix` names `full`
/// itself or one of its ancestors. `"foo"` is not a prefix of `"foobar"`.
pub fn strip_path_prefix<'a>(full: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    let rest = full.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with(SEPARATOR) {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
