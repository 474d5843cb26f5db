// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod check;
mod help;
mod rename;
mod resolve;
mod run;

/// Split job fanning out to three jobs in a `team` folder.
pub const TEAM_CATALOG: &str = r#"
[[job]]
name = "team/split"
next = "a, b, off"

[[job.parameterized]]
projects = "c"
condition = "always"

[job.join]
projects = "join"
post_actions = ["archive"]

[[job]]
name = "team/a"

[[job]]
name = "team/b"

[[job]]
name = "team/c"

[[job]]
name = "team/join"

[[job]]
name = "team/off"
disabled = true
"#;
