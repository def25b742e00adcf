//! Runtime resolver
//!
//! Client-side lookup of a descriptor from the current navigation path or
//! `?id=` query. Each navigation loads its own catalog snapshot and moves the
//! published state `Idle → Loading → {Found, NotFound, FetchFailed}`.
//!
//! A newer navigation does not cancel an older in-flight load; the older result
//! is dropped when it arrives.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{CatalogSnapshot, ExtensionDescriptor, RouteLayout};
use crate::error::Result;
use crate::registry::{canonical_key, normalize_catalog};
use crate::service::CatalogFetcher;

/// Source of a catalog snapshot for one navigation
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load(&self) -> Result<CatalogSnapshot>;
}

#[async_trait]
impl CatalogLoader for CatalogFetcher {
    async fn load(&self) -> Result<CatalogSnapshot> {
        let raw = self.fetch().await?;
        let descriptors = normalize_catalog(&raw.entries)?;
        CatalogSnapshot::new(descriptors, raw.source)
    }
}

/// A catalog already in memory
pub struct StaticCatalog(pub CatalogSnapshot);

#[async_trait]
impl CatalogLoader for StaticCatalog {
    async fn load(&self) -> Result<CatalogSnapshot> {
        Ok(self.0.clone())
    }
}

/// Result of looking a key up in a snapshot. A miss is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ExtensionDescriptor),
    NotFound { key: String },
}

/// Extract the lookup key from a location.
///
/// Accepts a bare path, a path with query, or a full URL. Both
/// `<detail>/<id>` and `<detail>?id=<id>` forms are recognised, and the key is
/// canonicalized with the same rule the normalizer used to mint ids.
///
/// Both forms hand `canonical_key` the still-encoded value so each is
/// percent-decoded exactly once.
pub fn lookup_key(layout: &RouteLayout, location: &str) -> Option<String> {
    let base = url::Url::parse("http://localhost/").ok()?;
    let url = base.join(location.trim()).ok()?;

    let prefix = layout.detail_prefix();
    let path = url.path().trim_end_matches('/');

    let raw = if path == prefix {
        url.query()?
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| *name == "id")
            .map(|(_, value)| value.to_string())?
    } else {
        let rest = path.strip_prefix(&prefix)?.strip_prefix('/')?;
        rest.split('/').next()?.to_string()
    };

    let key = canonical_key(&raw);
    (!key.is_empty()).then_some(key)
}

/// Look up an already-extracted key
pub fn resolve(snapshot: &CatalogSnapshot, key: &str) -> Resolution {
    let key = canonical_key(key);
    match snapshot.get(&key) {
        Some(descriptor) => Resolution::Found(descriptor.clone()),
        None => Resolution::NotFound { key },
    }
}

/// Published state of the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverState {
    Idle,
    Loading {
        navigation: u64,
        key: Option<String>,
    },
    Found {
        navigation: u64,
        descriptor: Box<ExtensionDescriptor>,
    },
    NotFound {
        navigation: u64,
        key: String,
    },
    FetchFailed {
        navigation: u64,
        message: String,
    },
}

impl ResolverState {
    pub fn navigation(&self) -> Option<u64> {
        match self {
            ResolverState::Idle => None,
            ResolverState::Loading { navigation, .. }
            | ResolverState::Found { navigation, .. }
            | ResolverState::NotFound { navigation, .. }
            | ResolverState::FetchFailed { navigation, .. } => Some(*navigation),
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            ResolverState::Found { .. }
                | ResolverState::NotFound { .. }
                | ResolverState::FetchFailed { .. }
        )
    }
}

/// What happened to a navigation's result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The result became the published state
    Applied(ResolverState),
    /// A newer navigation started first; the result was discarded
    Superseded { navigation: u64 },
}

pub struct RuntimeResolver {
    loader: Arc<dyn CatalogLoader>,
    layout: RouteLayout,
    navigations: AtomicU64,
    state: watch::Sender<ResolverState>,
}

impl RuntimeResolver {
    pub fn new(loader: Arc<dyn CatalogLoader>, layout: RouteLayout) -> Self {
        let (state, _) = watch::channel(ResolverState::Idle);
        Self {
            loader,
            layout,
            navigations: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ResolverState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ResolverState {
        self.state.borrow().clone()
    }

    /// Resolve `location` for a new navigation.
    pub async fn navigate(&self, location: &str) -> NavigationOutcome {
        let key = lookup_key(&self.layout, location);

        // Ticket assignment and the Loading transition happen under the watch
        // lock so tickets and published Loading states are ordered the same way.
        let mut navigation = 0;
        self.state.send_modify(|state| {
            navigation = self.navigations.fetch_add(1, Ordering::SeqCst) + 1;
            *state = ResolverState::Loading {
                navigation,
                key: key.clone(),
            };
        });
        debug!("[Resolver] Navigation {} -> {}", navigation, location);

        let next = match self.loader.load().await {
            Ok(snapshot) => match key {
                Some(key) => match resolve(&snapshot, &key) {
                    Resolution::Found(descriptor) => ResolverState::Found {
                        navigation,
                        descriptor: Box::new(descriptor),
                    },
                    Resolution::NotFound { key } => ResolverState::NotFound { navigation, key },
                },
                None => ResolverState::NotFound {
                    navigation,
                    key: location.to_string(),
                },
            },
            Err(e) => {
                warn!("[Resolver] Navigation {} failed to load catalog: {}", navigation, e);
                ResolverState::FetchFailed {
                    navigation,
                    message: e.to_string(),
                }
            }
        };

        let applied = self.state.send_if_modified(|current| {
            if current.navigation() == Some(navigation) {
                *current = next.clone();
                true
            } else {
                false
            }
        });

        if applied {
            info!("[Resolver] Navigation {} settled", navigation);
            NavigationOutcome::Applied(next)
        } else {
            debug!("[Resolver] Discarding superseded navigation {}", navigation);
            NavigationOutcome::Superseded { navigation }
        }
    }
}
