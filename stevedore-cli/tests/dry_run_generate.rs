use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const CONFIG: &str = r#"services:
  billing:
    name: billing
    image: billing:1.0
    port: 8080
    containerPath: /srv/billing
    serviceLocalPath: /opt/services/billing
    secrets:
      API_KEY: abc123
"#;

fn stevedore_cmd(root: &Path, home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("stevedore"));
    cmd.current_dir(root)
        .env("HOME", home)
        .env("USERPROFILE", home);
    cmd
}

#[test]
fn dry_run_writes_nothing_and_reports_would_writes() {
    let home = TempDir::new().expect("home");
    let root = TempDir::new().expect("root");
    fs::write(root.path().join("config.yaml"), CONFIG).expect("write config");

    stevedore_cmd(root.path(), home.path())
        .args(["generate", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("[dry-run]"))
        .stdout(contains("billing"));

    assert!(
        !root.path().join("billing").exists(),
        "dry-run must not create service directories"
    );
}

#[test]
fn dry_run_json_carries_normalized_namespace_and_no_cluster_state() {
    let home = TempDir::new().expect("home");
    let root = TempDir::new().expect("root");
    fs::write(root.path().join("config.yaml"), CONFIG).expect("write config");

    let assert = stevedore_cmd(root.path(), home.path())
        .args(["generate", "--dry-run", "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("parse generate json");

    assert_eq!(payload["summary"]["generated"], 1);
    assert_eq!(payload["summary"]["skipped"], 0);
    assert_eq!(payload["summary"]["files"], 3, "service, deployment, secrets");

    let service = &payload["services"][0];
    assert_eq!(service["name"], "billing");
    assert_eq!(service["status"], "generated");
    assert_eq!(service["namespace"], "default");
    assert!(
        service["namespace_status"].is_null(),
        "dry-run must not have queried the cluster"
    );
    assert_eq!(service["files"].as_array().expect("files array").len(), 3);
}

#[test]
fn skipped_records_surface_their_missing_fields() {
    let home = TempDir::new().expect("home");
    let root = TempDir::new().expect("root");
    fs::write(
        root.path().join("config.yaml"),
        "services:\n  broken:\n    name: broken\n    image: broken:1.0\n",
    )
    .expect("write config");

    stevedore_cmd(root.path(), home.path())
        .args(["generate", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("skipped"))
        .stdout(contains("containerPath"));

    assert!(!root.path().join("broken").exists());
}

#[test]
fn missing_source_document_fails_with_its_path() {
    let home = TempDir::new().expect("home");
    let root = TempDir::new().expect("root");

    stevedore_cmd(root.path(), home.path())
        .args(["generate", "--dry-run"])
        .assert()
        .failure()
        .stderr(contains("config.yaml"));
}
