//! Defaulting normalizer — fills the optional fields a record may omit.
//!
//! Replica policy is namespace-derived: a record whose resolved namespace is
//! `"dev"` always runs a single replica, whatever `replicaCount` says.

use crate::types::ServiceRecord;

/// Namespace assigned when a record does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Namespace whose services are pinned to a single replica.
pub const DEV_NAMESPACE: &str = "dev";

/// Return an enriched copy of `record` with namespace and replica defaults
/// applied. Pure — the input is never mutated.
///
/// - absent or empty `namespace` becomes [`DEFAULT_NAMESPACE`]; anything else
///   is lower-cased;
/// - a resolved namespace of [`DEV_NAMESPACE`] forces `replica_count` to 1,
///   replacing any provided value;
/// - every other field passes through unchanged, including an absent
///   `replica_count` (the deployment template supplies its own default).
pub fn normalize(record: &ServiceRecord) -> ServiceRecord {
    let mut normalized = record.clone();

    let namespace = match record.namespace.as_deref() {
        Some(ns) if !ns.is_empty() => ns.to_lowercase(),
        _ => DEFAULT_NAMESPACE.to_owned(),
    };

    if namespace == DEV_NAMESPACE {
        normalized.replica_count = Some(1);
    }
    normalized.namespace = Some(namespace);

    normalized
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
