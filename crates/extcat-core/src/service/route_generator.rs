//! Page/route generator
//!
//! Registers one detail route per descriptor plus the listing route. Detail
//! registrations run as independent tasks; `generate` joins every one of them
//! before returning and fails if any did not register.

use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::domain::{encode_json, CatalogSnapshot, OutputArtifact, Route, RouteLayout, RouteTable};
use crate::error::{CatalogError, Result};

pub struct RouteGenerator {
    layout: RouteLayout,
}

impl RouteGenerator {
    pub fn new(layout: RouteLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &RouteLayout {
        &self.layout
    }

    /// Build the routing table for a snapshot.
    pub async fn generate(&self, snapshot: &CatalogSnapshot) -> Result<Arc<RouteTable>> {
        let table = Arc::new(RouteTable::new());

        let listing = encode_json(snapshot.descriptors()).map_err(|e| CatalogError::Route {
            message: format!("failed to serialize listing: {}", e),
        })?;
        table.register(OutputArtifact::new(Route::listing(&self.layout), listing))?;

        let mut units = JoinSet::new();
        for position in 0..snapshot.len() {
            let snapshot = snapshot.clone();
            let table = Arc::clone(&table);
            let layout = self.layout.clone();
            units.spawn(async move { register_detail(&snapshot, position, &layout, &table) });
        }

        // Join point: every unit finishes before we decide the outcome
        let mut failures: Vec<CatalogError> = Vec::new();
        while let Some(joined) = units.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failures.push(e),
                Err(join_error) => failures.push(CatalogError::Route {
                    message: format!("registration task did not complete: {}", join_error),
                }),
            }
        }

        if let Some(first) = failures.into_iter().next() {
            error!("[Routes] Route generation failed: {}", first);
            return Err(first);
        }

        let detail_routes = table.detail_count();
        if detail_routes != snapshot.len() {
            return Err(CatalogError::Route {
                message: format!(
                    "registered {} detail routes for {} descriptors",
                    detail_routes,
                    snapshot.len()
                ),
            });
        }

        info!(
            "[Routes] Registered {} detail routes and listing route {}",
            detail_routes,
            self.layout.listing_path()
        );
        Ok(table)
    }
}

fn register_detail(
    snapshot: &CatalogSnapshot,
    position: usize,
    layout: &RouteLayout,
    table: &RouteTable,
) -> Result<()> {
    let descriptor = &snapshot.descriptors()[position];
    let payload = encode_json(descriptor).map_err(|e| CatalogError::Route {
        message: format!("failed to serialize '{}': {}", descriptor.id, e),
    })?;

    let route = Route::detail(layout, &descriptor.id);
    debug!("[Routes] {} -> {}", route.path, route.data);
    table.register(OutputArtifact::new(route, payload))
}
