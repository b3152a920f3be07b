//! Tests for working area discovery

use pilot_git::{Error, ProjectFingerprint, WorkingAreaError, WorkingAreaResolver};
use pilot_test_utils::area::TestArea;
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn resolves_root_from_the_root_itself() {
    let area = TestArea::new();

    let root = WorkingAreaResolver::default().resolve(area.root()).unwrap();

    assert_eq!(root.to_native(), area.root());
}

#[test]
fn resolves_root_from_a_nested_directory() {
    let area = TestArea::new();
    let nested = area.mkdir("models/vae/data");

    let root = WorkingAreaResolver::default().resolve(&nested).unwrap();

    assert_eq!(root.to_native(), area.root());
}

#[test]
fn resolution_is_idempotent() {
    let area = TestArea::new();
    let resolver = WorkingAreaResolver::default();

    let first = resolver.resolve(area.root()).unwrap();
    let second = resolver.resolve(area.root()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn directory_outside_any_repository_is_not_found() {
    let temp = tempfile::TempDir::new().unwrap();

    let err = WorkingAreaResolver::default()
        .resolve(temp.path())
        .unwrap_err();

    assert!(matches!(
        err,
        Error::WorkingArea(WorkingAreaError::NotFound { .. })
    ));
}

#[test]
fn repository_without_marker_is_an_identity_mismatch() {
    let area = TestArea::without_marker();

    let err = WorkingAreaResolver::default()
        .resolve(area.root())
        .unwrap_err();

    assert!(matches!(
        err,
        Error::WorkingArea(WorkingAreaError::IdentityMismatch { .. })
    ));
}

#[test]
fn project_name_must_match_marker() {
    let area = TestArea::new();
    let resolver = WorkingAreaResolver::new(
        ProjectFingerprint::default().with_project_name("someone-else"),
    );

    let err = resolver.resolve(area.root()).unwrap_err();

    match err {
        Error::WorkingArea(WorkingAreaError::IdentityMismatch { expected, reason, .. }) => {
            assert_eq!(expected, "someone-else");
            assert!(reason.contains(TestArea::PROJECT_NAME), "reason: {reason}");
        }
        other => panic!("expected identity mismatch, got {other:?}"),
    }
}

#[test]
fn project_name_match_is_accepted() {
    let area = TestArea::new();
    let resolver = WorkingAreaResolver::new(
        ProjectFingerprint::default().with_project_name(TestArea::PROJECT_NAME),
    );

    assert!(resolver.resolve(area.root()).is_ok());
}

#[test]
fn marker_without_name_fails_named_check() {
    let area = TestArea::new();
    fs::write(area.root().join(".pilot/project.toml"), "version = 1\n").unwrap();
    let resolver =
        WorkingAreaResolver::new(ProjectFingerprint::default().with_project_name("pilot"));

    assert!(matches!(
        resolver.resolve(area.root()),
        Err(Error::WorkingArea(WorkingAreaError::IdentityMismatch { .. }))
    ));
}
