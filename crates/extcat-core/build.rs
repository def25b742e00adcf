//! Generates `branding_generated.rs` from the workspace-level branding.toml.
//!
//! Keys missing from the file fall back to the defaults below.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// (constant, branding.toml key, default, doc line)
const BRANDING_KEYS: &[(&str, &str, &str, &str)] = &[
    ("DISPLAY_NAME", "display_name", "Extcat", "User-facing display name"),
    ("IDENTIFIER", "identifier", "com.extcat.site", "Reverse-domain site identifier"),
    (
        "CATALOG_URL",
        "catalog_url",
        "https://extensions.extcat.dev/servers.json",
        "Canonical remote catalog endpoint",
    ),
    (
        "ROUTE_BASE",
        "route_base",
        "/extensions",
        "Listing route; detail routes live under `<base>/detail`",
    ),
    ("LOG_PREFIX", "log_prefix", "extcat", "Log file prefix"),
    ("USER_AGENT", "user_agent", "Extcat/0.1", "User-Agent sent when fetching the catalog"),
];

fn main() {
    println!("cargo:rerun-if-changed=../../branding.toml");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let branding_path = Path::new(&manifest_dir).join("../../branding.toml");
    let content = fs::read_to_string(&branding_path).unwrap_or_default();

    let mut generated = String::from("// Generated from branding.toml by build.rs. Do not edit.\n");
    for (constant, key, default, doc) in BRANDING_KEYS {
        let value = branding_value(&content, key).unwrap_or(default);
        write!(generated, "\n/// {doc}\npub const {constant}: &str = {value:?};\n").unwrap();
    }

    let out_path = Path::new(&env::var("OUT_DIR").unwrap()).join("branding_generated.rs");
    fs::write(&out_path, generated).expect("Failed to write branding_generated.rs");
}

/// Quoted string value for `key = "..."`, ignoring comments and tables
fn branding_value<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with('['))
        .filter_map(|line| line.split_once('='))
        .find(|(name, _)| name.trim() == key)
        .and_then(|(_, value)| {
            let value = value.trim();
            value.strip_prefix('"')?.strip_suffix('"')
        })
}
