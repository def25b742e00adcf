//! Catalog fetcher
//!
//! Source precedence: the pinned local snapshot when it exists, otherwise the
//! remote endpoint. Remote requests get a bounded number of attempts with a
//! fixed backoff; only transport failures and 5xx/429 responses are retried.
//!
//! The fetcher never writes to disk and never reports a malformed body as an
//! empty catalog.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::branding;
use crate::domain::{CatalogSource, FetchPolicy, SiteConfig};
use crate::error::{CatalogError, Result};
use crate::registry::parse_catalog_body;

/// Raw catalog entries plus where they came from
#[derive(Debug, Clone)]
pub struct RawCatalog {
    pub entries: Vec<Value>,
    pub source: CatalogSource,
}

/// Outcome of a single remote attempt
enum AttemptError {
    Retryable(String),
    Fatal(String),
}

pub struct CatalogFetcher {
    catalog_url: String,
    local_snapshot: PathBuf,
    policy: FetchPolicy,
    client: reqwest::Client,
}

impl CatalogFetcher {
    /// Create a fetcher with an HTTP client built from the config's policy
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch.timeout)
            .user_agent(branding::USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(config, client))
    }

    /// Create with a custom HTTP client (useful for testing)
    pub fn with_client(config: &SiteConfig, client: reqwest::Client) -> Self {
        Self {
            catalog_url: config.catalog_url.clone(),
            local_snapshot: config.local_snapshot_path(),
            policy: config.fetch.clone(),
            client,
        }
    }

    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    pub fn local_snapshot_path(&self) -> &Path {
        &self.local_snapshot
    }

    /// Fetch the raw catalog, preferring the pinned local snapshot.
    pub async fn fetch(&self) -> Result<RawCatalog> {
        if self.policy.prefer_local && self.local_snapshot.exists() {
            return self.fetch_local().await;
        }
        self.fetch_remote().await
    }

    /// Read the pinned snapshot. A present-but-broken file is an error, not a
    /// reason to fall back to the network.
    pub async fn fetch_local(&self) -> Result<RawCatalog> {
        let path = &self.local_snapshot;
        let origin = path.display().to_string();

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CatalogError::fetch(&origin, format!("failed to read: {}", e)))?;
        let entries = parse_catalog_body(&content).map_err(|e| CatalogError::fetch(&origin, e))?;

        info!(
            "[Fetcher] Loaded {} catalog entries from local snapshot {}",
            entries.len(),
            origin
        );
        Ok(RawCatalog {
            entries,
            source: CatalogSource::LocalSnapshot { path: path.clone() },
        })
    }

    /// Fetch from the remote endpoint, ignoring any local snapshot.
    pub async fn fetch_remote(&self) -> Result<RawCatalog> {
        let body = self.fetch_remote_body().await?;
        let entries =
            parse_catalog_body(&body).map_err(|e| CatalogError::fetch(&self.catalog_url, e))?;

        info!(
            "[Fetcher] Fetched {} catalog entries from {}",
            entries.len(),
            self.catalog_url
        );
        Ok(RawCatalog {
            entries,
            source: CatalogSource::Remote {
                url: self.catalog_url.clone(),
            },
        })
    }

    /// Remote body with retry applied; not yet parsed
    pub(crate) async fn fetch_remote_body(&self) -> Result<String> {
        let attempts = self.policy.attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.request_once().await {
                Ok(body) => return Ok(body),
                Err(AttemptError::Fatal(message)) => {
                    return Err(CatalogError::fetch(&self.catalog_url, message));
                }
                Err(AttemptError::Retryable(message)) => {
                    if attempt < attempts {
                        warn!(
                            "[Fetcher] Attempt {}/{} for {} failed: {}. Retrying in {:?}",
                            attempt, attempts, self.catalog_url, message, self.policy.backoff
                        );
                        tokio::time::sleep(self.policy.backoff).await;
                    }
                    last_error = message;
                }
            }
        }

        Err(CatalogError::fetch(
            &self.catalog_url,
            format!("{} (after {} attempts)", last_error, attempts),
        ))
    }

    async fn request_once(&self) -> std::result::Result<String, AttemptError> {
        debug!("[Fetcher] GET {}", self.catalog_url);

        let response = self
            .client
            .get(&self.catalog_url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AttemptError::Retryable(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::Retryable(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(AttemptError::Fatal(format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| AttemptError::Retryable(format!("failed to read body: {}", e)))
    }
}
