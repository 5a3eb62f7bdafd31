//! Domain types for the stevedore service set.
//!
//! Records deserialize permissively: every schema field is optional at this
//! layer so that a half-written `config.yaml` still loads. Required-ness is
//! a validation concern (`source::missing_required_fields`), not a parse
//! failure. All types are serializable/deserializable via serde + serde_yaml.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which source document a service set was loaded from.
///
/// Core services (`core.yaml`) are infrastructure the regular services assume
/// is already running; they are validated more loosely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Regular,
    Core,
}

impl SourceKind {
    /// File name of the source document under the working root.
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceKind::Regular => "config.yaml",
            SourceKind::Core => "core.yaml",
        }
    }

    pub fn is_core(&self) -> bool {
        matches!(self, SourceKind::Core)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Regular => write!(f, "regular"),
            SourceKind::Core => write!(f, "core"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Horizontal scaling bounds for one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoscaleSpec {
    pub min_replicas: u32,
    pub max_replicas: u32,
    #[serde(default = "default_target_cpu")]
    pub target_cpu_percent: u32,
}

fn default_target_cpu() -> u32 {
    80
}

/// One service as declared in `config.yaml` / `core.yaml`.
///
/// Field names mirror the on-disk schema (`containerPath`, `dependsOn`, ...).
/// `config_values` uses a `BTreeMap` so rendered config maps list keys in a
/// stable order regardless of declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_local_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replica_count: Option<u32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config_values: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscale: Option<AutoscaleSpec>,
}

impl ServiceRecord {
    /// The name to orchestrate under: the record's own `name`, or the map key
    /// it was declared under when the record never set one.
    pub fn name_or(&self, key: &str) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => key.to_owned(),
        }
    }
}

/// Root of a stevedore source document.
///
/// `IndexMap` keeps declaration order; dependency dispatch and report output
/// both walk services in the order the operator wrote them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServiceSet {
    #[serde(default)]
    pub services: IndexMap<String, ServiceRecord>,
}

impl ServiceSet {
    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ServiceRecord> {
        self.services.get(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
