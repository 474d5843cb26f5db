// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use joinery_core::{BuildId, BuildResult, JobName};
use yare::parameterized;

fn record(job: &str, number: u64) -> JoinState {
    let mut state = JoinState::new(
        job,
        number,
        [JobName::new("b")].into_iter().collect(),
        BuildResult::Unstable,
    )
    .targets(vec![JobName::new("join")]);
    state.observed.insert(JobName::new("a"), vec![BuildResult::Failure, BuildResult::Success]);
    state.considered.insert(BuildId::new("a#1"));
    state.considered.insert(BuildId::new("a#2"));
    state
}

fn write_raw(path: &Path, json: &str) {
    let compressed = zstd::stream::encode_all(json.as_bytes(), 3).unwrap();
    fs::write(path, compressed).unwrap();
}

#[test]
fn save_then_load_preserves_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joins.snapshot");
    let snapshot = Snapshot::new(vec![record("split", 1), record("team/split", 4)]);

    snapshot.save(&path).unwrap();
    let loaded = Snapshot::load(&path).unwrap().unwrap();

    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.version, CURRENT_SNAPSHOT_VERSION);
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn file_is_compressed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joins.snapshot");
    Snapshot::new(vec![record("split", 1)]).save(&path).unwrap();

    let raw = fs::read(&path).unwrap();
    assert!(serde_json::from_slice::<serde_json::Value>(&raw).is_err());
}

#[test]
fn missing_snapshot_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Snapshot::load(&dir.path().join("absent")).unwrap().is_none());
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state/nested/joins.snapshot");

    Snapshot::new(Vec::new()).save(&path).unwrap();

    assert!(path.exists());
}

#[test]
fn repeated_saves_rotate_backups() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joins.snapshot");

    for n in 1..=5 {
        Snapshot::new(vec![record("split", n)]).save(&path).unwrap();
    }

    assert!(path.with_extension("bak").exists());
    assert!(path.with_extension("bak.2").exists());
    assert!(path.with_extension("bak.3").exists());
    assert!(!path.with_extension("bak.4").exists());
    let latest = Snapshot::load(&path).unwrap().unwrap();
    assert_eq!(latest.records[0].split_number, 5);
    let previous = Snapshot::load(&path.with_extension("bak")).unwrap().unwrap();
    assert_eq!(previous.records[0].split_number, 4);
}

#[test]
fn newer_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joins.snapshot");
    write_raw(&path, r#"{"v": 99, "created_at": "2025-01-01T00:00:00Z", "future": true}"#);

    let err = Snapshot::load(&path).unwrap_err();

    assert!(matches!(err, SnapshotError::TooNew { found: 99, supported: 1 }));
    assert!(err.to_string().contains("snapshot version 99 is newer than supported"));
}

#[parameterized(
    not_zstd = { b"{\"v\": 1}".as_slice() },
    truncated = { &[0x28, 0xb5, 0x2f, 0xfd][..] },
)]
fn undecodable_file_is_io_error(bytes: &[u8]) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joins.snapshot");
    fs::write(&path, bytes).unwrap();

    assert!(matches!(Snapshot::load(&path), Err(SnapshotError::Io(_))));
}

#[test]
fn malformed_json_is_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joins.snapshot");
    write_raw(&path, r#"{"v": 1, "created_at": "yesterday"}"#);

    assert!(matches!(Snapshot::load(&path), Err(SnapshotError::Json(_))));
}

#[test]
fn records_default_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joins.snapshot");
    write_raw(&path, r#"{"v": 1, "created_at": "2025-01-01T00:00:00Z"}"#);

    let snapshot = Snapshot::load(&path).unwrap().unwrap();
    assert!(snapshot.records.is_empty());
}
