//! Site builder - runs one full catalog build
//!
//! The catalog is fetched and normalized exactly once; the resulting snapshot
//! is handed to the route generator and the exporter so both work from the
//! same data. Any stage failure fails the build. Detail files are swapped in
//! as a whole directory, so a failed build never mixes old and new files.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::domain::{CatalogSnapshot, CatalogSource, SiteConfig};
use crate::error::Result;
use crate::service::{CatalogFetcher, CatalogLoader, RouteGenerator, StaticExporter};

/// Summary of a finished build
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub source: CatalogSource,
    pub descriptors: usize,
    pub detail_routes: usize,
    pub listing_routes: usize,
    pub files_written: usize,
    pub stale_removed: usize,
    pub detail_dir: PathBuf,
    pub listing_file: PathBuf,
    pub manifest_file: PathBuf,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

pub struct SiteBuilder {
    config: SiteConfig,
    fetcher: CatalogFetcher,
    generator: RouteGenerator,
    exporter: StaticExporter,
}

impl SiteBuilder {
    pub fn new(config: SiteConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = CatalogFetcher::new(&config)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Create with a preconfigured fetcher (useful for testing)
    pub fn with_fetcher(config: SiteConfig, fetcher: CatalogFetcher) -> Self {
        let generator = RouteGenerator::new(config.layout());
        Self {
            config,
            fetcher,
            generator,
            exporter: StaticExporter::new(),
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &CatalogFetcher {
        &self.fetcher
    }

    /// Fetch and normalize the catalog once
    pub async fn load_snapshot(&self) -> Result<CatalogSnapshot> {
        let snapshot = self.fetcher.load().await?;
        info!(
            "[Build] Loaded snapshot with {} descriptors from {}",
            snapshot.len(),
            snapshot.source()
        );
        Ok(snapshot)
    }

    /// Fetch, normalize, generate routes and export
    pub async fn build(&self) -> Result<BuildReport> {
        let snapshot = self.load_snapshot().await?;
        self.build_snapshot(&snapshot).await
    }

    /// Generate routes and export for an already-loaded snapshot
    pub async fn build_snapshot(&self, snapshot: &CatalogSnapshot) -> Result<BuildReport> {
        let started_at = Utc::now();
        let timer = Instant::now();
        let detail_dir = self.config.detail_out_dir();

        info!(
            "[Build] Building {} extension pages into {}",
            snapshot.len(),
            self.config.out_dir.display()
        );

        // Nothing on disk changes until every route registered
        let routes = self.generator.generate(snapshot).await?;
        let published = self.exporter.publish(snapshot, &detail_dir).await?;
        let listing = self
            .exporter
            .export_listing(&routes, self.generator.layout(), &self.config.out_dir)
            .await?;

        let report = BuildReport {
            source: snapshot.source().clone(),
            descriptors: snapshot.len(),
            detail_routes: routes.detail_count(),
            listing_routes: routes.listing_count(),
            files_written: published.files_written,
            stale_removed: published.stale_removed,
            detail_dir,
            listing_file: listing.listing,
            manifest_file: listing.manifest,
            started_at,
            duration_ms: timer.elapsed().as_millis() as u64,
        };

        info!(
            "[Build] Done: {} detail routes, {} files in {}ms",
            report.detail_routes, report.files_written, report.duration_ms
        );
        Ok(report)
    }
}
