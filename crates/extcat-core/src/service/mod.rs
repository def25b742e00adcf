//! Pipeline services
//!
//! Fetch → normalize → {route generation, static export, runtime resolution}.

mod catalog_fetcher;
mod route_generator;
mod runtime_resolver;
mod site_builder;
mod snapshot_pinner;
mod static_exporter;

pub use catalog_fetcher::*;
pub use route_generator::*;
pub use runtime_resolver::*;
pub use site_builder::*;
pub use snapshot_pinner::*;
pub use static_exporter::*;
