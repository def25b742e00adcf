//! Catalog pipeline error types
//!
//! `Fetch`, `Io` and `Route` abort the whole build. `Schema` and `DuplicateId`
//! abort normalization of the whole catalog; no entry is ever skipped.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised anywhere in the fetch → normalize → generate → export pipeline
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport failure, bad status, or a body that is not a JSON array
    #[error("Failed to fetch catalog from {origin}: {message}")]
    Fetch { origin: String, message: String },

    /// A descriptor is missing a required field or has an unusable type
    #[error("Invalid catalog {location}: {message}")]
    Schema { location: String, message: String },

    /// Two descriptors normalize to the same id
    #[error("Duplicate extension id '{id}' (catalog entries #{first} and #{second})")]
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },

    /// Static export could not touch the filesystem
    #[error("Failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A route path was bound twice
    #[error("Route {path} is already registered")]
    RouteConflict { path: String },

    /// A route registration unit did not complete
    #[error("Route registration failed: {message}")]
    Route { message: String },

    /// Invalid runtime configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub(crate) fn fetch(origin: impl Into<String>, message: impl std::fmt::Display) -> Self {
        CatalogError::Fetch {
            origin: origin.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        CatalogError::Schema {
            location: "entry".to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the catalog position to a schema error raised for a single entry
    pub(crate) fn at_index(self, index: usize) -> Self {
        match self {
            CatalogError::Schema { message, .. } => CatalogError::Schema {
                location: format!("entry #{}", index),
                message,
            },
            other => other,
        }
    }

    /// Short machine-readable name, used in logs and CLI exit summaries
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Fetch { .. } => "fetch",
            CatalogError::Schema { .. } => "schema",
            CatalogError::DuplicateId { .. } => "duplicate_id",
            CatalogError::Io { .. } => "io",
            CatalogError::RouteConflict { .. } | CatalogError::Route { .. } => "route",
            CatalogError::Config(_) => "config",
        }
    }
}
