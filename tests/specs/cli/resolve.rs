// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `joinery resolve` specs

use crate::prelude::*;

#[test]
fn resolves_relative_reference() {
    cli().args(&["resolve", "foo/bar", "../baz/qux"]).passes().stdout_eq("foo/baz/qux\n");
}

#[test]
fn absolute_reference_ignores_context() {
    cli().args(&["resolve", "foo", "/bar"]).passes().stdout_eq("bar\n");
}

#[test]
fn root_context_is_empty_string() {
    cli().args(&["resolve", "", "./foo"]).passes().stdout_eq("foo\n");
}

#[test]
fn underflow_fails() {
    cli().args(&["resolve", "foo", "../../bar"]).fails().stderr_has("Error:");
}

#[test]
fn json_output_includes_inputs() {
    let json = cli().args(&["resolve", "foo", "bar", "-o", "json"]).passes().json();
    assert_eq!(json["context"], "foo");
    assert_eq!(json["reference"], "bar");
    assert_eq!(json["canonical"], "foo/bar");
}
