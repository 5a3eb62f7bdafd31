use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use stevedore_cluster::{
    ClusterBackend, ClusterError, Orchestrator, OrchestratorError, ReadinessProbe,
};
use stevedore_core::types::ServiceSet;

type EventLog = Rc<RefCell<Vec<String>>>;

/// Backend that records every call instead of shelling out.
struct RecordingBackend {
    events: EventLog,
}

impl ClusterBackend for RecordingBackend {
    fn namespace_exists(&self, namespace: &str) -> Result<bool, ClusterError> {
        self.events.borrow_mut().push(format!("exists:{namespace}"));
        Ok(true)
    }

    fn create_namespace(&self, namespace: &str) -> Result<(), ClusterError> {
        self.events.borrow_mut().push(format!("create:{namespace}"));
        Ok(())
    }

    fn apply_manifests(&self, path: &Path) -> Result<(), ClusterError> {
        self.events.borrow_mut().push(format!("apply:{}", path.display()));
        Ok(())
    }

    fn delete_manifests(&self, path: &Path) -> Result<(), ClusterError> {
        self.events.borrow_mut().push(format!("delete:{}", path.display()));
        Ok(())
    }
}

/// Probe that records polls and reports ready after a fixed number of them.
struct CountdownProbe {
    events: EventLog,
    ready_after: u32,
    polls: Cell<u32>,
}

impl ReadinessProbe for CountdownProbe {
    fn is_ready(&self, service: &str) -> bool {
        self.events.borrow_mut().push(format!("poll:{service}"));
        let seen = self.polls.get() + 1;
        self.polls.set(seen);
        seen > self.ready_after
    }
}

fn harness(ready_after: u32) -> (EventLog, RecordingBackend, CountdownProbe) {
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    let backend = RecordingBackend { events: Rc::clone(&events) };
    let probe = CountdownProbe { events: Rc::clone(&events), ready_after, polls: Cell::new(0) };
    (events, backend, probe)
}

fn set_from_yaml(yaml: &str) -> ServiceSet {
    serde_yaml::from_str(yaml).expect("service set yaml")
}

#[test]
fn dependencies_start_before_dependents_with_a_gate_between() {
    let (events, backend, probe) = harness(2);
    let orchestrator = Orchestrator::new(&backend, &probe)
        .with_poll_interval(Duration::ZERO)
        .with_max_attempts(10);

    let set = set_from_yaml(
        "services:
  a: {}
  b:
    dependsOn: [a]
  c:
    dependsOn: [a]
",
    );

    let report = orchestrator.start_all(Path::new("/work"), &set).unwrap();
    assert_eq!(report.dispatched, vec!["a".to_string()]);
    assert_eq!(report.released, vec!["b".to_string(), "c".to_string()]);

    let log = events.borrow();
    assert_eq!(
        *log,
        vec![
            "apply:/work/a".to_string(),
            "poll:a".to_string(),
            "poll:a".to_string(),
            "poll:a".to_string(),
            "apply:/work/b".to_string(),
            "apply:/work/c".to_string(),
        ],
        "a must be applied before any poll, and b/c only after the gate opens"
    );
}

#[test]
fn each_service_is_applied_at_most_once() {
    let (events, backend, probe) = harness(0);
    let orchestrator = Orchestrator::new(&backend, &probe)
        .with_poll_interval(Duration::ZERO)
        .with_max_attempts(5);

    // `a` is dependency-free AND a dependency of both others; `b` is both a
    // dependent and a dependency of `c`.
    let set = set_from_yaml(
        "services:
  a: {}
  b:
    dependsOn: [a]
  c:
    dependsOn: [a, b]
",
    );

    let report = orchestrator.start_all(Path::new("/work"), &set).unwrap();
    assert_eq!(report.dispatched, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(report.released, vec!["c".to_string()]);

    let applies: Vec<String> = events
        .borrow()
        .iter()
        .filter(|e| e.starts_with("apply:"))
        .cloned()
        .collect();
    assert_eq!(
        applies,
        vec![
            "apply:/work/a".to_string(),
            "apply:/work/b".to_string(),
            "apply:/work/c".to_string(),
        ]
    );
}

#[test]
fn no_dependents_means_no_polling() {
    let (events, backend, probe) = harness(0);
    let orchestrator = Orchestrator::new(&backend, &probe).with_poll_interval(Duration::ZERO);

    let set = set_from_yaml(
        "services:
  solo-one: {}
  solo-two: {}
",
    );

    let report = orchestrator.start_all(Path::new("/work"), &set).unwrap();
    assert_eq!(report.dispatched.len(), 2);
    assert!(report.released.is_empty());
    assert!(
        !events.borrow().iter().any(|e| e.starts_with("poll:")),
        "nothing was pending, so the readiness gate must not run"
    );
}

#[test]
fn records_with_explicit_names_start_under_that_name() {
    let (events, backend, probe) = harness(0);
    let orchestrator = Orchestrator::new(&backend, &probe).with_poll_interval(Duration::ZERO);

    let set = set_from_yaml(
        "services:
  entry-key:
    name: renamed
",
    );

    orchestrator.start_all(Path::new("/work"), &set).unwrap();
    assert_eq!(*events.borrow(), vec!["apply:/work/renamed".to_string()]);
}

#[test]
fn start_and_stop_touch_exactly_one_service() {
    let (events, backend, probe) = harness(0);
    let orchestrator = Orchestrator::new(&backend, &probe);

    orchestrator.start(Path::new("/work"), "billing").unwrap();
    orchestrator.stop(Path::new("/work"), "billing").unwrap();

    assert_eq!(
        *events.borrow(),
        vec!["apply:/work/billing".to_string(), "delete:/work/billing".to_string()]
    );
}

#[test]
fn gate_timeout_aborts_before_releasing_dependents() {
    let (events, backend, probe) = harness(u32::MAX);
    let orchestrator = Orchestrator::new(&backend, &probe)
        .with_poll_interval(Duration::ZERO)
        .with_max_attempts(4);

    let set = set_from_yaml(
        "services:
  web:
    dependsOn: [db]
",
    );

    let err = orchestrator.start_all(Path::new("/work"), &set).unwrap_err();
    assert!(matches!(
        err,
        OrchestratorError::ReadinessTimeout { ref service, attempts: 4 } if service == "db"
    ));
    assert!(
        !events.borrow().iter().any(|e| e == "apply:/work/web"),
        "dependents must not be released after a readiness timeout"
    );
}
