//! Routes, output artifacts and the build routing table.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::branding;
use crate::error::{CatalogError, Result};

/// Path layout shared by the route generator, the exporter and the runtime resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLayout {
    base: String,
}

impl Default for RouteLayout {
    fn default() -> Self {
        Self::new(branding::ROUTE_BASE)
    }
}

impl RouteLayout {
    /// `base` is the listing path, e.g. "/extensions"
    pub fn new(base: &str) -> Self {
        let trimmed = base.trim().trim_matches('/');
        Self {
            base: format!("/{}", trimmed),
        }
    }

    pub fn listing_path(&self) -> String {
        self.base.clone()
    }

    /// Prefix of every detail route, without trailing slash
    pub fn detail_prefix(&self) -> String {
        if self.base == "/" {
            "/detail".to_string()
        } else {
            format!("{}/detail", self.base)
        }
    }

    /// Path-segment form: `/extensions/detail/<id>`
    pub fn detail_path(&self, id: &str) -> String {
        format!("{}/{}", self.detail_prefix(), id)
    }

    /// Query form: `/extensions/detail?id=<id>`
    pub fn detail_query_path(&self, id: &str) -> String {
        format!("{}?id={}", self.detail_prefix(), urlencoding::encode(id))
    }

    /// Directory (relative to the site root) holding `<id>.json` data files
    pub fn detail_dir(&self) -> String {
        self.detail_prefix().trim_start_matches('/').to_string()
    }

    /// Data file backing a detail route, relative to the site root
    pub fn detail_data_file(&self, id: &str) -> String {
        format!("{}/{}.json", self.detail_dir(), id)
    }

    /// Data file backing the listing route, relative to the site root
    pub fn listing_data_file(&self) -> String {
        let stem = self.base.trim_matches('/');
        if stem.is_empty() {
            "index.json".to_string()
        } else {
            format!("{}.json", stem)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteKind {
    Listing,
    Detail { id: String },
}

/// A URL path bound to a data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    #[serde(flatten)]
    pub kind: RouteKind,
    /// Data file relative to the site root
    pub data: String,
}

impl Route {
    pub fn listing(layout: &RouteLayout) -> Self {
        Self {
            path: layout.listing_path(),
            kind: RouteKind::Listing,
            data: layout.listing_data_file(),
        }
    }

    pub fn detail(layout: &RouteLayout, id: &str) -> Self {
        Self {
            path: layout.detail_path(id),
            kind: RouteKind::Detail { id: id.to_string() },
            data: layout.detail_data_file(id),
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self.kind, RouteKind::Detail { .. })
    }
}

/// One route plus the serialized payload it serves.
///
/// Created once at content-load time and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    route: Route,
    payload: Arc<[u8]>,
}

impl OutputArtifact {
    pub fn new(route: Route, payload: Vec<u8>) -> Self {
        Self {
            route,
            payload: payload.into(),
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Routing table for one build. Safe for concurrent registration.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: DashMap<String, OutputArtifact>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a path. A second binding for the same path is a conflict, never an overwrite.
    pub fn register(&self, artifact: OutputArtifact) -> Result<()> {
        match self.routes.entry(artifact.route.path.clone()) {
            Entry::Occupied(existing) => Err(CatalogError::RouteConflict {
                path: existing.key().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(artifact);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn detail_count(&self) -> usize {
        self.routes.iter().filter(|r| r.route.is_detail()).count()
    }

    pub fn listing_count(&self) -> usize {
        self.routes.iter().filter(|r| !r.route.is_detail()).count()
    }

    pub fn get(&self, path: &str) -> Option<OutputArtifact> {
        self.routes.get(path).map(|r| r.value().clone())
    }

    /// All routes sorted by path
    pub fn routes(&self) -> Vec<Route> {
        let mut routes: Vec<Route> = self.routes.iter().map(|r| r.route.clone()).collect();
        routes.sort_by(|a, b| a.path.cmp(&b.path));
        routes
    }

    pub fn manifest(&self) -> RouteManifest {
        RouteManifest {
            routes: self.routes(),
        }
    }
}

/// Serialized route table written as `routes.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteManifest {
    pub routes: Vec<Route>,
}
