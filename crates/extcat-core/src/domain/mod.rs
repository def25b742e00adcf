//! Domain types
//!
//! - Descriptors (normalized catalog entries and their page actions)
//! - Snapshots (the immutable catalog for one build or navigation)
//! - Routes (layout, artifacts, routing table, manifest)
//! - Configuration

pub mod config;
mod descriptor;
mod route;
mod snapshot;

pub use config::{FetchPolicy, SiteConfig, LOCAL_SNAPSHOT_FILENAME};
pub use descriptor::*;
pub use route::*;
pub use snapshot::*;

/// Serialize a payload the way every exported data file is written:
/// pretty-printed, struct field order, trailing newline.
pub fn encode_json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}
