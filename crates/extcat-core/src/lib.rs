//! # Extcat Core Library
//!
//! Turns a published catalog of extension (MCP server) descriptors into
//! statically exportable documentation pages.
//!
//! ## Modules
//!
//! - `branding` - Centralized branding constants (generated from branding.toml)
//! - `domain` - Descriptors, snapshots, routes and configuration
//! - `registry` - Catalog shape validation, normalization and id derivation
//! - `service` - Fetcher, route generator, exporter, runtime resolver, site builder
//! - `error` - Pipeline error taxonomy

pub mod branding;
pub mod domain;
pub mod error;
pub mod registry;
pub mod service;

// Re-export commonly used types
pub use domain::*;
pub use error::{CatalogError, Result};
pub use service::*;
