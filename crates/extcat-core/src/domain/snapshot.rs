//! Immutable catalog snapshot shared by every stage of one build or navigation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::ExtensionDescriptor;
use crate::error::{CatalogError, Result};

/// Where a snapshot's raw catalog came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogSource {
    /// Pinned JSON file next to the site's static assets
    LocalSnapshot { path: PathBuf },
    /// Canonical remote endpoint
    Remote { url: String },
    /// Built in memory (tests, embedding)
    Inline,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::LocalSnapshot { path } => write!(f, "local snapshot {}", path.display()),
            CatalogSource::Remote { url } => write!(f, "{}", url),
            CatalogSource::Inline => write!(f, "inline catalog"),
        }
    }
}

/// Listing order for catalog queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Upstream catalog order
    #[default]
    Catalog,
    /// Most GitHub stars first, ties by name
    StarsDesc,
    /// Alphabetical by display name
    NameAsc,
}

/// A normalized catalog that cannot change after construction.
///
/// Cloning is cheap; every clone shares the same descriptors.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    descriptors: Arc<[ExtensionDescriptor]>,
    index: Arc<HashMap<String, usize>>,
    source: CatalogSource,
}

impl CatalogSnapshot {
    /// Build a snapshot, rejecting duplicate ids.
    pub fn new(descriptors: Vec<ExtensionDescriptor>, source: CatalogSource) -> Result<Self> {
        let mut index = HashMap::with_capacity(descriptors.len());
        for (position, descriptor) in descriptors.iter().enumerate() {
            if let Some(first) = index.insert(descriptor.id.clone(), position) {
                return Err(CatalogError::DuplicateId {
                    id: descriptor.id.clone(),
                    first,
                    second: position,
                });
            }
        }

        Ok(Self {
            descriptors: descriptors.into(),
            index: Arc::new(index),
            source,
        })
    }

    pub fn empty(source: CatalogSource) -> Self {
        Self {
            descriptors: Vec::new().into(),
            index: Arc::new(HashMap::new()),
            source,
        }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in catalog order
    pub fn descriptors(&self) -> &[ExtensionDescriptor] {
        &self.descriptors
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtensionDescriptor> {
        self.descriptors.iter()
    }

    /// Exact id lookup. Callers that start from a URL must canonicalize the key first.
    pub fn get(&self, id: &str) -> Option<&ExtensionDescriptor> {
        self.index.get(id).map(|&i| &self.descriptors[i])
    }

    /// Case-insensitive text search over id, name and description
    pub fn search(&self, query: &str) -> Vec<&ExtensionDescriptor> {
        let query_lower = query.trim().to_lowercase();
        if query_lower.is_empty() {
            return self.descriptors.iter().collect();
        }
        self.descriptors
            .iter()
            .filter(|d| d.matches(&query_lower))
            .collect()
    }

    /// All descriptors in the requested order
    pub fn sorted(&self, order: SortOrder) -> Vec<&ExtensionDescriptor> {
        let mut items: Vec<&ExtensionDescriptor> = self.descriptors.iter().collect();
        match order {
            SortOrder::Catalog => {}
            SortOrder::StarsDesc => items.sort_by(|a, b| {
                b.github_stars
                    .cmp(&a.github_stars)
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }),
            SortOrder::NameAsc => {
                items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }
        }
        items
    }
}
