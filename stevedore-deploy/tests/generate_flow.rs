use std::cell::RefCell;
use std::fs;
use std::path::Path;

use stevedore_cluster::{ClusterBackend, ClusterError};
use stevedore_deploy::{generate_at, GenerateOptions, RecordOutcome};
use tempfile::TempDir;

struct NoopBackend {
    calls: RefCell<Vec<String>>,
}

impl NoopBackend {
    fn new() -> Self {
        NoopBackend { calls: RefCell::new(Vec::new()) }
    }
}

impl ClusterBackend for NoopBackend {
    fn namespace_exists(&self, namespace: &str) -> Result<bool, ClusterError> {
        self.calls.borrow_mut().push(format!("exists:{namespace}"));
        Ok(true)
    }
    fn create_namespace(&self, namespace: &str) -> Result<(), ClusterError> {
        self.calls.borrow_mut().push(format!("create:{namespace}"));
        Ok(())
    }
    fn apply_manifests(&self, path: &Path) -> Result<(), ClusterError> {
        self.calls.borrow_mut().push(format!("apply:{}", path.display()));
        Ok(())
    }
    fn delete_manifests(&self, path: &Path) -> Result<(), ClusterError> {
        self.calls.borrow_mut().push(format!("delete:{}", path.display()));
        Ok(())
    }
}

const CONFIG: &str = r#"services:
  api:
    name: api
    image: api:3.1
    port: 8000
    containerPath: /srv/api
    serviceLocalPath: /opt/services/api
    namespace: Dev
    replicaCount: 5
    configValues:
      log_level: debug
      feature_flags: "on"
    secrets:
      API_KEY: abc123
    autoscale:
      minReplicas: 2
      maxReplicas: 4
"#;

fn generated_root() -> (TempDir, NoopBackend) {
    let _ = env_logger::builder().is_test(true).try_init();
    let root = TempDir::new().expect("tempdir");
    fs::write(root.path().join("config.yaml"), CONFIG).expect("config");
    let backend = NoopBackend::new();
    generate_at(root.path(), &backend, &GenerateOptions::default()).expect("generate");
    (root, backend)
}

#[test]
fn all_five_documents_land_on_disk() {
    let (root, _) = generated_root();
    let dir = root.path().join("api");
    for file in ["service.yaml", "deployment.yml", "configmap.yml", "secrets.yml", "hpa.yml"] {
        assert!(dir.join(file).exists(), "{file} missing");
    }
}

#[test]
fn dev_namespace_forces_one_replica_on_disk() {
    let (root, backend) = generated_root();
    let deployment = fs::read_to_string(root.path().join("api").join("deployment.yml")).unwrap();
    assert!(
        deployment.contains("replicas: 1"),
        "dev namespace must override replicaCount=5:\n{deployment}"
    );
    assert!(deployment.contains("namespace: \"dev\""));
    assert!(
        backend.calls.borrow().contains(&"exists:dev".to_string()),
        "namespace reconciliation must see the lower-cased namespace"
    );
}

#[test]
fn secrets_on_disk_are_base64_encoded() {
    let (root, _) = generated_root();
    let secrets = fs::read_to_string(root.path().join("api").join("secrets.yml")).unwrap();
    assert!(secrets.contains("YWJjMTIz"), "expected base64 payload:\n{secrets}");
    assert!(!secrets.contains("abc123"), "plaintext secret leaked:\n{secrets}");
}

#[test]
fn configmap_keys_are_hyphenated_on_disk() {
    let (root, _) = generated_root();
    let configmap = fs::read_to_string(root.path().join("api").join("configmap.yml")).unwrap();
    assert!(configmap.contains("log-level: \"debug\""));
    assert!(configmap.contains("feature-flags: \"on\""));
    assert!(!configmap.contains("log_level"));

    let deployment = fs::read_to_string(root.path().join("api").join("deployment.yml")).unwrap();
    assert!(deployment.contains("name: api-env"), "deployment must reference api-env");
}

#[test]
fn autoscaler_carries_the_default_cpu_target() {
    let (root, _) = generated_root();
    let hpa = fs::read_to_string(root.path().join("api").join("hpa.yml")).unwrap();
    assert!(hpa.contains("minReplicas: 2"));
    assert!(hpa.contains("maxReplicas: 4"));
    assert!(hpa.contains("averageUtilization: 80"), "targetCpuPercent defaults to 80:\n{hpa}");
}

#[test]
fn regeneration_is_idempotent_and_replacing() {
    let (root, backend) = generated_root();
    let dir = root.path().join("api");
    let before = fs::read_to_string(dir.join("deployment.yml")).unwrap();

    generate_at(root.path(), &backend, &GenerateOptions::default()).expect("second generate");
    let after = fs::read_to_string(dir.join("deployment.yml")).unwrap();
    assert_eq!(before, after, "unchanged input must produce byte-identical output");

    // Drop the config section; the regenerated tree must lose both the file
    // content and the envFrom reference.
    let updated = CONFIG
        .replace("    configValues:\n      log_level: debug\n      feature_flags: \"on\"\n", "");
    fs::write(root.path().join("config.yaml"), updated).unwrap();
    let report = generate_at(root.path(), &backend, &GenerateOptions::default()).unwrap();

    let deployment = fs::read_to_string(dir.join("deployment.yml")).unwrap();
    assert!(!deployment.contains("envFrom"), "stale envFrom survived regeneration");
    match report.outcomes.first().expect("outcome") {
        RecordOutcome::Generated { writes, .. } => {
            assert_eq!(writes.len(), 4, "configmap.yml no longer part of the set");
        }
        other => panic!("expected generated, got {other:?}"),
    }
}
