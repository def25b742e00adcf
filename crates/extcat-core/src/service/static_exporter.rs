//! Static exporter
//!
//! Writes `<id>.json` per descriptor so a static host can serve detail data
//! without a running server, plus the listing payload and route manifest.
//! Output is byte-for-byte reproducible for the same snapshot.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domain::{encode_json, CatalogSnapshot, ExtensionDescriptor, RouteLayout, RouteTable};
use crate::error::{CatalogError, Result};

/// File name of the route manifest at the site root
pub const ROUTE_MANIFEST_FILENAME: &str = "routes.json";

/// Concurrent file writes in flight
const WRITE_CONCURRENCY: usize = 32;

/// Outcome of [`StaticExporter::publish`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Published {
    pub files_written: usize,
    /// Data files in the replaced directory whose id left the catalog
    pub stale_removed: usize,
}

/// Files written by [`StaticExporter::export_listing`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFiles {
    pub listing: PathBuf,
    pub manifest: PathBuf,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StaticExporter;

impl StaticExporter {
    pub fn new() -> Self {
        Self
    }

    /// Write one data file per descriptor into `out_dir`; returns the number written.
    ///
    /// Existing files for the same id are overwritten.
    pub async fn export(&self, snapshot: &CatalogSnapshot, out_dir: &Path) -> Result<usize> {
        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|e| CatalogError::io(out_dir, e))?;

        stream::iter(snapshot.iter())
            .map(|descriptor| write_descriptor(out_dir, descriptor))
            .buffer_unordered(WRITE_CONCURRENCY)
            .try_collect::<Vec<()>>()
            .await?;

        info!(
            "[Export] Wrote {} data files to {}",
            snapshot.len(),
            out_dir.display()
        );
        Ok(snapshot.len())
    }

    /// Replace `out_dir` with a fresh export of `snapshot`.
    ///
    /// Files are written into a sibling staging directory which is swapped in
    /// only once every write succeeded. On failure the live directory is left
    /// exactly as the previous build wrote it.
    pub async fn publish(&self, snapshot: &CatalogSnapshot, out_dir: &Path) -> Result<Published> {
        let staging = sibling_dir(out_dir, "staging")?;
        let previous = sibling_dir(out_dir, "previous")?;
        remove_dir_if_present(&staging).await?;
        remove_dir_if_present(&previous).await?;

        let files_written = match self.export(snapshot, &staging).await {
            Ok(count) => count,
            Err(e) => {
                if let Err(cleanup) = remove_dir_if_present(&staging).await {
                    warn!("[Export] Failed to clean up staging dir: {}", cleanup);
                }
                return Err(e);
            }
        };

        let live = path_exists(out_dir).await;
        let stale_removed = if live {
            stale_files(snapshot, out_dir).await?.len()
        } else {
            0
        };

        if live {
            tokio::fs::rename(out_dir, &previous)
                .await
                .map_err(|e| CatalogError::io(out_dir, e))?;
        }
        if let Err(e) = tokio::fs::rename(&staging, out_dir).await {
            if live {
                // Put the previous build back before reporting
                if let Err(restore) = tokio::fs::rename(&previous, out_dir).await {
                    warn!("[Export] Failed to restore {}: {}", out_dir.display(), restore);
                }
            }
            return Err(CatalogError::io(out_dir, e));
        }
        if let Err(e) = remove_dir_if_present(&previous).await {
            warn!("[Export] Failed to remove previous export: {}", e);
        }

        if stale_removed > 0 {
            info!("[Export] Dropped {} stale data files", stale_removed);
        }
        debug!("[Export] Published {}", out_dir.display());
        Ok(Published {
            files_written,
            stale_removed,
        })
    }

    /// Write the listing payload and `routes.json` under `site_dir`.
    ///
    /// The listing bytes are taken from the routing table, so the exported
    /// listing is exactly what the listing route is bound to.
    pub async fn export_listing(
        &self,
        routes: &RouteTable,
        layout: &RouteLayout,
        site_dir: &Path,
    ) -> Result<ListingFiles> {
        let listing_route = layout.listing_path();
        let listing = routes.get(&listing_route).ok_or_else(|| CatalogError::Route {
            message: format!("listing route {} is not registered", listing_route),
        })?;

        let listing_path = site_dir.join(&listing.route().data);
        write_file(&listing_path, listing.payload()).await?;

        let manifest_path = site_dir.join(ROUTE_MANIFEST_FILENAME);
        let manifest = encode_json(&routes.manifest())
            .map_err(|e| CatalogError::io(&manifest_path, e.into()))?;
        write_file(&manifest_path, &manifest).await?;

        info!(
            "[Export] Wrote listing {} and manifest with {} routes",
            listing_path.display(),
            routes.len()
        );
        Ok(ListingFiles {
            listing: listing_path,
            manifest: manifest_path,
        })
    }
}

async fn write_descriptor(out_dir: &Path, descriptor: &ExtensionDescriptor) -> Result<()> {
    let path = out_dir.join(format!("{}.json", descriptor.id));
    let bytes = encode_json(descriptor).map_err(|e| CatalogError::io(&path, e.into()))?;
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| CatalogError::io(&path, e))
}

/// `*.json` files in `dir` whose stem is not an id in the snapshot
async fn stale_files(snapshot: &CatalogSnapshot, dir: &Path) -> Result<Vec<PathBuf>> {
    let live: HashSet<&str> = snapshot.iter().map(|d| d.id.as_str()).collect();
    let mut stale = Vec::new();

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| CatalogError::io(dir, e))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CatalogError::io(dir, e))?
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if !live.contains(stem) => stale.push(path),
            _ => {}
        }
    }
    Ok(stale)
}

/// `.<name>.<suffix>` next to `dir`
fn sibling_dir(dir: &Path, suffix: &str) -> Result<PathBuf> {
    let name = dir.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        CatalogError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "export dir has no name"),
        )
    })?;
    let sibling = format!(".{}.{}", name, suffix);
    Ok(match dir.parent() {
        Some(parent) => parent.join(sibling),
        None => PathBuf::from(sibling),
    })
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn remove_dir_if_present(dir: &Path) -> Result<()> {
    if !path_exists(dir).await {
        return Ok(());
    }
    tokio::fs::remove_dir_all(dir)
        .await
        .map_err(|e| CatalogError::io(dir, e))
}

/// Write `bytes` to a temporary file next to `path`, then rename it over `path`.
///
/// Readers see either the old file or the new one, never a partial write.
pub(crate) async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CatalogError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    if let Err(e) = tokio::fs::write(&tmp, bytes).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(CatalogError::io(&tmp, e));
    }
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| CatalogError::io(path, e))
}

/// `.<file>.tmp` next to `path`
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}
