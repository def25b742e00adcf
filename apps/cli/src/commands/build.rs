//! `extcat build`

use anyhow::{Context, Result};
use tracing::error;

use extcat_core::{SiteBuilder, SiteConfig};

pub async fn run(config: SiteConfig, json: bool) -> Result<()> {
    let builder = SiteBuilder::new(config).context("Failed to set up site build")?;

    let report = match builder.build().await {
        Ok(report) => report,
        Err(e) => {
            error!("[Build] {} error: {}", e.kind(), e);
            return Err(e).context("Catalog build failed");
        }
    };

    if json {
        return super::print_json(&report);
    }

    println!("Catalog source:  {}", report.source);
    println!("Descriptors:     {}", report.descriptors);
    println!(
        "Routes:          {} detail + {} listing",
        report.detail_routes, report.listing_routes
    );
    println!(
        "Data files:      {} written to {}",
        report.files_written,
        report.detail_dir.display()
    );
    if report.stale_removed > 0 {
        println!("Stale removed:   {}", report.stale_removed);
    }
    println!("Listing:         {}", report.listing_file.display());
    println!("Route manifest:  {}", report.manifest_file.display());
    println!("Finished in {}ms", report.duration_ms);
    Ok(())
}
