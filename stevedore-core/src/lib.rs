//! Stevedore core library — service-set domain types, source loading, and
//! the defaulting normalizer.
//!
//! Public API surface:
//! - [`types`] — domain structs for the on-disk schema
//! - [`error`] — [`ConfigError`]
//! - [`source`] — load / validate
//! - [`normalize`] — namespace and replica defaults

pub mod error;
pub mod normalize;
pub mod source;
pub mod types;

pub use error::ConfigError;
pub use normalize::normalize;
pub use types::{AutoscaleSpec, ServiceRecord, ServiceSet, SourceKind};
