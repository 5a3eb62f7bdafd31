//! # stevedore-renderer
//!
//! Tera-based template engine that renders Kubernetes manifests from
//! normalized service records.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stevedore_core::types::ServiceRecord;
//! use stevedore_renderer::{ManifestKind, Renderer};
//!
//! fn render_all(name: &str, record: &ServiceRecord) {
//!     if let Ok(renderer) = Renderer::new() {
//!         for kind in ManifestKind::for_service(record) {
//!             if let Ok(text) = renderer.render(name, record, kind) {
//!                 println!("{}:\n{text}", kind.file_name());
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! Templates are embedded in the binary; users may override individual
//! templates by dropping `.tera` files into `~/.stevedore/templates`.

pub mod context;
pub mod engine;
pub mod error;

pub use context::ManifestContext;
pub use engine::{user_template_dir, ManifestKind, Renderer, TemplateEngine};
pub use error::RenderError;
