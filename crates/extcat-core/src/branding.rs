//! Centralized branding constants
//!
//! All product naming and default endpoints come from this module.
//! Generated from branding.toml at build time.
//!
//! # Usage
//!
//! ```rust
//! use extcat_core::branding;
//!
//! println!("Site: {}", branding::DISPLAY_NAME);
//! println!("Catalog: {}", branding::CATALOG_URL);
//! ```

include!(concat!(env!("OUT_DIR"), "/branding_generated.rs"));

/// Directory under the platform data dir used for logs and scratch files
pub fn data_dir_name() -> &'static str {
    IDENTIFIER
}
