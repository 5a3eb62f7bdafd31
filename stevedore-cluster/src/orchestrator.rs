//! Dependency-ordered startup.
//!
//! `start_all` runs in two waves: first every dependency (in the order the
//! dependent lists them) plus every dependency-free service (in declaration
//! order), then — once every awaited dependency reports ready — the pending
//! dependents. Each service is applied at most once per run, even when named
//! as a dependency by several records.
//!
//! There is no retry and no per-service failed state: the first apply/delete
//! failure aborts the remaining work for the invocation.

use std::cell::Cell;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use indexmap::IndexSet;

use stevedore_core::types::ServiceSet;

use crate::backend::ClusterBackend;
use crate::error::{ClusterError, OrchestratorError};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 240;

/// Readiness signal for one started service.
///
/// Polled with bounded retries before pending dependents are released; an
/// exhausted poll budget is an explicit [`OrchestratorError::ReadinessTimeout`],
/// not a silent continue.
pub trait ReadinessProbe {
    fn is_ready(&self, service: &str) -> bool;
}

/// Time-based readiness: a service counts as ready once a fixed grace period
/// has elapsed since polling began.
///
/// This is a heuristic, not an observation of actual service state — it
/// reproduces the fixed startup delay the engine always used, expressed
/// through the probe interface so a real probe can replace it without
/// touching the orchestrator.
pub struct GracePeriodProbe {
    grace: Duration,
    // Armed on the first poll, so the grace window starts when waiting
    // starts, not when the probe was constructed.
    armed: Cell<Option<Instant>>,
}

impl GracePeriodProbe {
    pub fn new(grace: Duration) -> Self {
        GracePeriodProbe { grace, armed: Cell::new(None) }
    }
}

impl ReadinessProbe for GracePeriodProbe {
    fn is_ready(&self, _service: &str) -> bool {
        let armed = match self.armed.get() {
            Some(at) => at,
            None => {
                let now = Instant::now();
                self.armed.set(Some(now));
                now
            }
        };
        armed.elapsed() >= self.grace
    }
}

/// What one `start_all` run applied, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartAllReport {
    /// Services applied up front: dependencies and dependency-free services.
    pub dispatched: Vec<String>,
    /// Pending dependents applied after the readiness gate.
    pub released: Vec<String>,
}

impl StartAllReport {
    pub fn total(&self) -> usize {
        self.dispatched.len() + self.released.len()
    }
}

/// Sequential start/stop driver over a [`ClusterBackend`].
pub struct Orchestrator<'a> {
    backend: &'a dyn ClusterBackend,
    probe: &'a dyn ReadinessProbe,
    poll_interval: Duration,
    max_attempts: u32,
}

impl<'a> Orchestrator<'a> {
    pub fn new(backend: &'a dyn ClusterBackend, probe: &'a dyn ReadinessProbe) -> Self {
        Orchestrator {
            backend,
            probe,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Start exactly one named service; no dependency resolution.
    pub fn start(&self, root: &Path, name: &str) -> Result<(), ClusterError> {
        log::info!("starting {name}");
        self.backend.apply_manifests(&root.join(name))
    }

    /// Stop exactly one named service; no cascading to dependents.
    pub fn stop(&self, root: &Path, name: &str) -> Result<(), ClusterError> {
        log::info!("stopping {name}");
        self.backend.delete_manifests(&root.join(name))
    }

    /// Start every service in `set`, dependencies before dependents.
    ///
    /// `root` is the directory the per-service manifest directories live in.
    pub fn start_all(
        &self,
        root: &Path,
        set: &ServiceSet,
    ) -> Result<StartAllReport, OrchestratorError> {
        let mut started: IndexSet<String> = IndexSet::new();
        let mut awaited: IndexSet<String> = IndexSet::new();
        let mut pending: Vec<String> = Vec::new();
        let mut report = StartAllReport::default();

        for (key, record) in &set.services {
            let name = record.name_or(key);
            if record.depends_on.is_empty() {
                if started.insert(name.clone()) {
                    log::info!("starting {name}");
                    self.backend.apply_manifests(&root.join(&name))?;
                    report.dispatched.push(name);
                }
            } else {
                for dep in &record.depends_on {
                    awaited.insert(dep.clone());
                    if started.insert(dep.clone()) {
                        log::info!("starting {dep} (dependency of {name})");
                        self.backend.apply_manifests(&root.join(dep))?;
                        report.dispatched.push(dep.clone());
                    }
                }
                pending.push(name);
            }
        }

        if !pending.is_empty() {
            for dep in &awaited {
                self.await_ready(dep)?;
            }
            for name in pending {
                if started.insert(name.clone()) {
                    log::info!("starting {name}");
                    self.backend.apply_manifests(&root.join(&name))?;
                    report.released.push(name);
                }
            }
        }

        Ok(report)
    }

    fn await_ready(&self, service: &str) -> Result<(), OrchestratorError> {
        for attempt in 1..=self.max_attempts {
            if self.probe.is_ready(service) {
                log::debug!("{service} ready after {attempt} checks");
                return Ok(());
            }
            if attempt < self.max_attempts {
                thread::sleep(self.poll_interval);
            }
        }
        Err(OrchestratorError::ReadinessTimeout {
            service: service.to_string(),
            attempts: self.max_attempts,
        })
    }
}
