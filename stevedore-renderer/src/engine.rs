//! Tera rendering engine — [`ManifestKind`] enum and [`Renderer`].
//!
//! # Output mapping
//!
//! | Kind       | Template             | Output file     |
//! |------------|----------------------|-----------------|
//! | Service    | `service.yaml.tera`  | `service.yaml`  |
//! | Deployment | `deployment.yml.tera`| `deployment.yml`|
//! | ConfigMap  | `configmap.yml.tera` | `configmap.yml` |
//! | Secret     | `secrets.yml.tera`   | `secrets.yml`   |
//! | Autoscaler | `hpa.yml.tera`       | `hpa.yml`       |
//!
//! Service and Deployment render for every service; the other three are
//! conditional on the record carrying the matching section.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tera::Tera;

use stevedore_core::types::ServiceRecord;

use crate::context::ManifestContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("service.yaml.tera", include_str!("templates/service.yaml.tera")),
    ("deployment.yml.tera", include_str!("templates/deployment.yml.tera")),
    ("configmap.yml.tera", include_str!("templates/configmap.yml.tera")),
    ("secrets.yml.tera", include_str!("templates/secrets.yml.tera")),
    ("hpa.yml.tera", include_str!("templates/hpa.yml.tera")),
];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path
            .strip_prefix(dir)
            .unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(
            normalize_template_name(Path::new(name)),
            (*content).to_string(),
        );
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

/// `<home>/.stevedore/templates` — the user template override directory, or
/// `None` when no home directory can be determined.
pub fn user_template_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".stevedore").join("templates"))
}

// ---------------------------------------------------------------------------
// ManifestKind
// ---------------------------------------------------------------------------

/// All manifest document kinds the engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    Service,
    Deployment,
    ConfigMap,
    Secret,
    Autoscaler,
}

impl ManifestKind {
    /// All kinds in a stable order (the order documents land on disk).
    pub fn all() -> &'static [ManifestKind] {
        &[
            ManifestKind::Service,
            ManifestKind::Deployment,
            ManifestKind::ConfigMap,
            ManifestKind::Secret,
            ManifestKind::Autoscaler,
        ]
    }

    /// Embedded template name for this kind.
    pub fn template_name(&self) -> &'static str {
        match self {
            ManifestKind::Service    => "service.yaml.tera",
            ManifestKind::Deployment => "deployment.yml.tera",
            ManifestKind::ConfigMap  => "configmap.yml.tera",
            ManifestKind::Secret     => "secrets.yml.tera",
            ManifestKind::Autoscaler => "hpa.yml.tera",
        }
    }

    /// Fixed output file name inside the per-service directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            ManifestKind::Service    => "service.yaml",
            ManifestKind::Deployment => "deployment.yml",
            ManifestKind::ConfigMap  => "configmap.yml",
            ManifestKind::Secret     => "secrets.yml",
            ManifestKind::Autoscaler => "hpa.yml",
        }
    }

    /// The kinds to render for `record` — the caller-side guard for the
    /// conditional documents. Service and Deployment always render; ConfigMap
    /// requires config values, Secret a secrets section, Autoscaler scaling
    /// bounds.
    pub fn for_service(record: &ServiceRecord) -> Vec<ManifestKind> {
        let mut kinds = vec![ManifestKind::Service, ManifestKind::Deployment];
        if !record.config_values.is_empty() {
            kinds.push(ManifestKind::ConfigMap);
        }
        if record.secrets.is_some() {
            kinds.push(ManifestKind::Secret);
        }
        if record.autoscale.is_some() {
            kinds.push(ManifestKind::Autoscaler);
        }
        kinds
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestKind::Service    => write!(f, "service"),
            ManifestKind::Deployment => write!(f, "deployment"),
            ManifestKind::ConfigMap  => write!(f, "configmap"),
            ManifestKind::Secret     => write!(f, "secret"),
            ManifestKind::Autoscaler => write!(f, "autoscaler"),
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering manifests with optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that override embedded
/// defaults. Template names are normalized to lowercase relative paths, so a
/// user file `service.yaml.tera` replaces the embedded service template.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Construct a new [`TemplateEngine`], loading embedded templates plus any
    /// overrides found in `user_template_dir`.
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render one manifest kind from the supplied context.
    ///
    /// Conditional kinds are checked against the context before rendering:
    /// asking for a Secret manifest when the record carried no secrets (or a
    /// ConfigMap/Autoscaler without their sections) is a caller contract
    /// violation and returns [`RenderError::SectionUnavailable`].
    pub fn render(
        &self,
        ctx: &ManifestContext,
        kind: ManifestKind,
    ) -> Result<String, RenderError> {
        match kind {
            ManifestKind::ConfigMap if ctx.config_data.is_empty() => {
                return Err(RenderError::SectionUnavailable {
                    kind: "configmap",
                    section: "configValues",
                });
            }
            ManifestKind::Secret if ctx.secret_data.is_none() => {
                return Err(RenderError::SectionUnavailable {
                    kind: "secret",
                    section: "secrets",
                });
            }
            ManifestKind::Autoscaler if ctx.autoscale.is_none() => {
                return Err(RenderError::SectionUnavailable {
                    kind: "autoscaler",
                    section: "autoscale",
                });
            }
            _ => {}
        }

        let tera_ctx = ctx.to_tera_context()?;
        let content = self.tera.render(kind.template_name(), &tera_ctx)?;
        Ok(content)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Tera-based renderer for all manifest kinds.
///
/// Create once per run and reuse; rendering itself is stateless per call.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(None)? })
    }

    /// Construct a [`Renderer`] that also loads `.tera` overrides from `dir`.
    pub fn with_template_dir(dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(dir)? })
    }

    /// Render one manifest kind for a normalized record.
    ///
    /// `name` is the resolved service name; all kinds rendered for one record
    /// share the context built here, so cross-references agree.
    pub fn render(
        &self,
        name: &str,
        record: &ServiceRecord,
        kind: ManifestKind,
    ) -> Result<String, RenderError> {
        let ctx = ManifestContext::from_record(name, record);
        self.render_with_context(&ctx, kind)
    }

    /// Render using a caller-provided [`ManifestContext`].
    pub fn render_with_context(
        &self,
        ctx: &ManifestContext,
        kind: ManifestKind,
    ) -> Result<String, RenderError> {
        self.engine.render(ctx, kind)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
