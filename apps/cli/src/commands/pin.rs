//! `extcat pin`

use anyhow::{Context, Result};

use extcat_core::{pin_snapshot, CatalogFetcher, SiteConfig};

pub async fn run(config: SiteConfig) -> Result<()> {
    let fetcher = CatalogFetcher::new(&config)?;
    let report = pin_snapshot(&fetcher)
        .await
        .with_context(|| format!("Failed to pin catalog from {}", config.catalog_url))?;

    println!(
        "Pinned {} entries from {} to {}",
        report.entries,
        report.url,
        report.path.display()
    );
    Ok(())
}
