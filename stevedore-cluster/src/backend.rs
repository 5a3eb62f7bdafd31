//! Control-plane collaborator — the narrow interface the rest of the engine
//! talks to the cluster through.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::ClusterError;

/// Abstract control-plane operations.
pub trait ClusterBackend {
    /// Whether `namespace` exists in the cluster.
    ///
    /// `Ok(false)` means the control plane answered "no such namespace" —
    /// expected control flow, not an error. `Err` is reserved for the control
    /// plane being unreachable or the query failing for any other reason.
    fn namespace_exists(&self, namespace: &str) -> Result<bool, ClusterError>;

    fn create_namespace(&self, namespace: &str) -> Result<(), ClusterError>;

    /// Apply every manifest under `path` (a per-service output directory).
    fn apply_manifests(&self, path: &Path) -> Result<(), ClusterError>;

    /// Delete every resource described by the manifests under `path`.
    fn delete_manifests(&self, path: &Path) -> Result<(), ClusterError>;
}

/// [`ClusterBackend`] backed by the `kubectl` binary.
pub struct KubectlBackend {
    program: PathBuf,
}

impl KubectlBackend {
    /// Backend invoking `kubectl` from PATH.
    pub fn new() -> Self {
        KubectlBackend { program: PathBuf::from("kubectl") }
    }

    /// Backend invoking an explicit program instead of `kubectl`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        KubectlBackend { program: program.into() }
    }

    fn run(&self, tool: &str, args: &[&str]) -> Result<Output, ClusterError> {
        Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| ClusterError::Spawn { tool: tool.to_string(), source: e })
    }
}

impl Default for KubectlBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn command_failed(tool: &str, output: Output) -> ClusterError {
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let detail = match (stdout.is_empty(), stderr.is_empty()) {
        (false, false) => format!("{stdout} {stderr}"),
        (false, true) => stdout,
        (true, false) => stderr,
        (true, true) => "no output".to_string(),
    };
    ClusterError::CommandFailed { tool: tool.to_string(), status: output.status, detail }
}

impl ClusterBackend for KubectlBackend {
    fn namespace_exists(&self, namespace: &str) -> Result<bool, ClusterError> {
        let tool = "kubectl get ns";
        let output =
            self.run(tool, &["get", "ns", namespace, "--no-headers", "--output=name"])?;
        if output.status.success() {
            return Ok(true);
        }
        // kubectl reports a missing namespace as `Error from server (NotFound)`.
        // That is the expected negative answer; anything else is a real failure.
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("NotFound") || stderr.contains("not found") {
            return Ok(false);
        }
        Err(command_failed(tool, output))
    }

    fn create_namespace(&self, namespace: &str) -> Result<(), ClusterError> {
        let tool = "kubectl create ns";
        let output = self.run(tool, &["create", "ns", namespace])?;
        if output.status.success() {
            return Ok(());
        }
        Err(command_failed(tool, output))
    }

    fn apply_manifests(&self, path: &Path) -> Result<(), ClusterError> {
        let tool = "kubectl apply";
        let target = path.display().to_string();
        let output = self.run(tool, &["apply", "-f", &target])?;
        if output.status.success() {
            return Ok(());
        }
        Err(command_failed(tool, output))
    }

    fn delete_manifests(&self, path: &Path) -> Result<(), ClusterError> {
        let tool = "kubectl delete";
        let target = path.display().to_string();
        let output = self.run(tool, &["delete", "-f", &target])?;
        if output.status.success() {
            return Ok(());
        }
        Err(command_failed(tool, output))
    }
}
