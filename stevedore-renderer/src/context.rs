//! Manifest context — serializable rendering payload built from a normalized
//! [`ServiceRecord`].
//!
//! One context feeds every manifest kind for a service, so the name,
//! namespace, and `{name}-env` cross-reference are computed exactly once and
//! agree across documents.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use stevedore_core::types::{AutoscaleSpec, ServiceRecord};

use crate::error::RenderError;

/// Rendering payload shared by all manifest templates for one service.
///
/// Optional fields stay `None` for privileged core records that never set
/// them; templates guard those sections. Fields a record cannot omit after
/// normalization (`name`, `namespace`) are plain strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestContext {
    /// Object name, selector label, container name, and volume-name stem.
    pub name: String,
    /// Normalized (lower-case, defaulted) namespace.
    pub namespace: String,
    /// Name of the generated config-map object: `{name}-env`.
    pub env_name: String,
    /// Whether a config map is generated — controls the deployment's
    /// `envFrom` reference.
    pub has_config: bool,
    pub image: Option<String>,
    pub port: Option<u16>,
    pub container_path: Option<String>,
    pub service_local_path: Option<String>,
    pub replicas: Option<u32>,
    /// Config-map data: keys rewritten `_` → `-`, values verbatim.
    pub config_data: BTreeMap<String, String>,
    /// Secret data: values base64-encoded. `None` when the record carries no
    /// `secrets` section at all.
    pub secret_data: Option<BTreeMap<String, String>>,
    pub autoscale: Option<AutoscaleSpec>,
}

impl ManifestContext {
    /// Build a [`ManifestContext`] from a normalized record.
    ///
    /// `name` is the resolved service name (the record's own `name`, or the
    /// map key it was declared under). The record is expected to have passed
    /// through [`stevedore_core::normalize`] first; an un-normalized
    /// namespace is defaulted here the same way as a missing one.
    pub fn from_record(name: &str, record: &ServiceRecord) -> Self {
        let namespace = record
            .namespace
            .clone()
            .unwrap_or_else(|| stevedore_core::normalize::DEFAULT_NAMESPACE.to_owned());

        let config_data: BTreeMap<String, String> = record
            .config_values
            .iter()
            .map(|(key, value)| (key.replace('_', "-"), value.clone()))
            .collect();

        let secret_data = record.secrets.as_ref().map(|secrets| {
            secrets
                .iter()
                .map(|(key, value)| (key.clone(), BASE64.encode(value.as_bytes())))
                .collect()
        });

        ManifestContext {
            name: name.to_owned(),
            env_name: format!("{name}-env"),
            has_config: !config_data.is_empty(),
            namespace,
            image: record.image.clone(),
            port: record.port,
            container_path: record.container_path.clone(),
            service_local_path: record.service_local_path.clone(),
            replicas: record.replica_count,
            config_data,
            secret_data,
            autoscale: record.autoscale,
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
