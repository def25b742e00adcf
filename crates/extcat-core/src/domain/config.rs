//! Runtime configuration for a catalog build.
//!
//! Defaults come from the branding constants; `EXTCAT_*` environment variables
//! override them, and the CLI overrides both.

use std::path::PathBuf;
use std::time::Duration;

use crate::branding;
use crate::domain::RouteLayout;
use crate::error::{CatalogError, Result};

/// File name of the pinned catalog inside the static asset directory
pub const LOCAL_SNAPSHOT_FILENAME: &str = "servers.json";

pub const ENV_CATALOG_URL: &str = "EXTCAT_CATALOG_URL";
pub const ENV_STATIC_DIR: &str = "EXTCAT_STATIC_DIR";
pub const ENV_OUT_DIR: &str = "EXTCAT_OUT_DIR";
pub const ENV_ROUTE_BASE: &str = "EXTCAT_ROUTE_BASE";
pub const ENV_FETCH_ATTEMPTS: &str = "EXTCAT_FETCH_ATTEMPTS";
pub const ENV_FETCH_BACKOFF_MS: &str = "EXTCAT_FETCH_BACKOFF_MS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "EXTCAT_HTTP_TIMEOUT_SECS";

/// Retry and transport policy for the remote catalog fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Total attempts for the remote request (1 = no retry)
    pub attempts: u32,
    /// Fixed delay between attempts
    pub backoff: Duration,
    /// Per-request timeout
    pub timeout: Duration,
    /// Permit plain `http://` endpoints (local mirrors, tests)
    pub allow_insecure: bool,
    /// Use the pinned local snapshot when it exists
    pub prefer_local: bool,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            backoff: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
            allow_insecure: false,
            prefer_local: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Canonical remote catalog endpoint
    pub catalog_url: String,
    /// Static asset root; the pinned catalog lives at `<static_dir>/servers.json`
    pub static_dir: PathBuf,
    /// Site output root for exported data and the route manifest
    pub out_dir: PathBuf,
    /// Listing route; detail routes hang off `<route_base>/detail`
    pub route_base: String,
    pub fetch: FetchPolicy,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            catalog_url: branding::CATALOG_URL.to_string(),
            static_dir: PathBuf::from("static"),
            out_dir: PathBuf::from("build"),
            route_base: branding::ROUTE_BASE.to_string(),
            fetch: FetchPolicy::default(),
        }
    }
}

impl SiteConfig {
    /// Defaults overridden by process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `EXTCAT_*` key
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_CATALOG_URL) {
            config.catalog_url = url;
        }
        if let Some(dir) = lookup(ENV_STATIC_DIR) {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_OUT_DIR) {
            config.out_dir = PathBuf::from(dir);
        }
        if let Some(base) = lookup(ENV_ROUTE_BASE) {
            config.route_base = base;
        }
        if let Some(raw) = lookup(ENV_FETCH_ATTEMPTS) {
            let attempts = parse_number(ENV_FETCH_ATTEMPTS, &raw)?;
            config.fetch.attempts = u32::try_from(attempts).map_err(|_| {
                CatalogError::Config(format!(
                    "{} is out of range, got '{}'",
                    ENV_FETCH_ATTEMPTS, raw
                ))
            })?;
        }
        if let Some(raw) = lookup(ENV_FETCH_BACKOFF_MS) {
            config.fetch.backoff = Duration::from_millis(parse_number(ENV_FETCH_BACKOFF_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_HTTP_TIMEOUT_SECS) {
            config.fetch.timeout = Duration::from_secs(parse_number(ENV_HTTP_TIMEOUT_SECS, &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.fetch.attempts == 0 {
            return Err(CatalogError::Config(
                "fetch attempts must be at least 1".to_string(),
            ));
        }

        let url = url::Url::parse(&self.catalog_url).map_err(|e| {
            CatalogError::Config(format!("catalog url '{}' is invalid: {}", self.catalog_url, e))
        })?;
        match url.scheme() {
            "https" => {}
            "http" if self.fetch.allow_insecure => {}
            scheme => {
                return Err(CatalogError::Config(format!(
                    "catalog url must use https (got '{}')",
                    scheme
                )))
            }
        }

        Ok(())
    }

    pub fn local_snapshot_path(&self) -> PathBuf {
        self.static_dir.join(LOCAL_SNAPSHOT_FILENAME)
    }

    pub fn layout(&self) -> RouteLayout {
        RouteLayout::new(&self.route_base)
    }

    /// Directory receiving `<id>.json` detail files
    pub fn detail_out_dir(&self) -> PathBuf {
        self.out_dir.join(self.layout().detail_dir())
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| CatalogError::Config(format!("{} must be a non-negative integer, got '{}'", key, raw)))
}
