//! Extension identity derivation
//!
//! One function decides what an id looks like. The normalizer uses it to mint
//! ids at build time and the runtime resolver uses it to canonicalize keys
//! taken from URLs; if the two ever disagree, valid links stop resolving.

use sha2::{Digest, Sha256};

/// Prefix for ids derived from a content hash
pub const HASH_ID_PREFIX: &str = "ext-";

const HASH_ID_HEX_LEN: usize = 12;

/// Lowercase ASCII alphanumerics; every run of other characters becomes one `-`.
///
/// Idempotent: `slugify(slugify(s)) == slugify(s)`.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;

    for ch in s.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    out
}

/// Stable id for a descriptor.
///
/// The explicit id wins when it has any slug-able content, then the name. When
/// both slug to nothing (e.g. a name in a non-Latin script) the id is a hash of
/// `name` and `link`. Catalog position never participates.
pub fn derive_id(explicit: Option<&str>, name: &str, link: &str) -> String {
    if let Some(id) = explicit {
        let slug = slugify(id);
        if !slug.is_empty() {
            return slug;
        }
    }

    let slug = slugify(name);
    if !slug.is_empty() {
        return slug;
    }

    content_hash_id(name, link)
}

fn content_hash_id(name: &str, link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(b"\n");
    hasher.update(link.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}{}", HASH_ID_PREFIX, &digest[..HASH_ID_HEX_LEN])
}

/// Canonicalize a lookup key taken from a path segment or `?id=` value.
pub fn canonical_key(raw: &str) -> String {
    let decoded = urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    slugify(&decoded)
}
