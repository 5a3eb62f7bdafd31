//! Source-loading error-message and validation integration tests.

use assert_fs::prelude::*;
use stevedore_core::{
    normalize::normalize,
    source::{load_services_at, missing_required_fields, source_path_at},
    ConfigError, SourceKind,
};

const WELL_FORMED: &str = r#"services:
  auth:
    name: auth
    image: auth:2.0
    port: 8080
    containerPath: /srv/auth
    serviceLocalPath: /opt/services/auth
  billing:
    name: billing
    image: billing:1.4
    port: 8081
    containerPath: /srv/billing
    serviceLocalPath: /opt/services/billing
    dependsOn:
      - auth
"#;

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_missing_source_mentions_path() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    let err = load_services_at(root.path(), SourceKind::Regular).unwrap_err();
    assert!(matches!(err, ConfigError::SourceNotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("config.yaml"));
}

#[test]
fn unparsable_yaml_reports_the_file_path() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("config.yaml")
        .write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = load_services_at(root.path(), SourceKind::Regular).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    let msg = err.to_string();
    assert!(msg.contains("config.yaml"), "must contain file path, got: {msg}");
    let source_msg = match &err {
        ConfigError::Parse { source, .. } => source.to_string(),
        _ => unreachable!(),
    };
    assert!(!source_msg.is_empty(), "serde_yaml must provide error context");
}

#[test]
fn non_mapping_document_is_a_parse_error() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("config.yaml")
        .write_str("- this is a list, not a mapping\n")
        .expect("write");

    let err = load_services_at(root.path(), SourceKind::Regular).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Source selection
// ---------------------------------------------------------------------------

#[test]
fn sources_are_mutually_exclusive_files() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("config.yaml").write_str(WELL_FORMED).expect("write");
    root.child("core.yaml")
        .write_str("services:\n  registry:\n    name: registry\n")
        .expect("write");

    let regular = load_services_at(root.path(), SourceKind::Regular).expect("regular");
    assert_eq!(regular.len(), 2);
    assert!(regular.get("registry").is_none(), "core records must not leak");

    let core = load_services_at(root.path(), SourceKind::Core).expect("core");
    assert_eq!(core.len(), 1);
    assert!(core.get("auth").is_none(), "regular records must not leak");
}

#[test]
fn source_paths_differ_per_kind() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    assert_ne!(
        source_path_at(root.path(), SourceKind::Regular),
        source_path_at(root.path(), SourceKind::Core)
    );
}

// ---------------------------------------------------------------------------
// 3. Validation against loaded documents
// ---------------------------------------------------------------------------

#[test]
fn loaded_records_pass_regular_validation() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("config.yaml").write_str(WELL_FORMED).expect("write");

    let set = load_services_at(root.path(), SourceKind::Regular).expect("load");
    for (key, record) in &set.services {
        assert!(
            missing_required_fields(record, SourceKind::Regular).is_empty(),
            "'{key}' unexpectedly incomplete"
        );
    }
}

#[test]
fn incomplete_record_is_flagged_not_rejected_at_parse_time() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("config.yaml")
        .write_str("services:\n  broken:\n    name: broken\n    port: 9000\n")
        .expect("write");

    // Parsing succeeds — required-ness is a validation concern.
    let set = load_services_at(root.path(), SourceKind::Regular).expect("load");
    let record = set.get("broken").expect("record");
    assert_eq!(
        missing_required_fields(record, SourceKind::Regular),
        vec!["image", "containerPath", "serviceLocalPath"]
    );
}

#[test]
fn core_source_accepts_sparse_records() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("core.yaml")
        .write_str("services:\n  dns:\n    name: dns\n    namespace: Kube-System\n")
        .expect("write");

    let set = load_services_at(root.path(), SourceKind::Core).expect("load");
    let record = set.get("dns").expect("record");
    assert!(missing_required_fields(record, SourceKind::Core).is_empty());

    // The same record fails the regular check.
    assert!(!missing_required_fields(record, SourceKind::Regular).is_empty());

    // And still normalizes like any other record.
    let normalized = normalize(record);
    assert_eq!(normalized.namespace.as_deref(), Some("kube-system"));
}
