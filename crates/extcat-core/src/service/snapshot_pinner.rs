//! Pin the remote catalog as the local snapshot
//!
//! Later builds read the pinned file instead of going to the network. The
//! remote body is validated (top-level shape and every entry) before anything
//! is written, so a bad upstream never replaces a good pin. The file is
//! replaced by rename, so a failed write leaves the old pin intact.

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::domain::encode_json;
use crate::error::{CatalogError, Result};
use crate::registry::normalize_catalog;
use crate::service::CatalogFetcher;

use super::static_exporter::write_file;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinReport {
    pub path: PathBuf,
    pub entries: usize,
    pub url: String,
}

/// Fetch the remote catalog and write it to the fetcher's local snapshot path.
pub async fn pin_snapshot(fetcher: &CatalogFetcher) -> Result<PinReport> {
    let raw = fetcher.fetch_remote().await?;
    normalize_catalog(&raw.entries)?;

    let path = fetcher.local_snapshot_path().to_path_buf();
    let bytes = encode_json(&raw.entries).map_err(|e| CatalogError::io(&path, e.into()))?;
    write_file(&path, &bytes).await?;

    info!(
        "[Pin] Pinned {} catalog entries from {} to {}",
        raw.entries.len(),
        fetcher.catalog_url(),
        path.display()
    );
    Ok(PinReport {
        path,
        entries: raw.entries.len(),
        url: fetcher.catalog_url().to_string(),
    })
}
