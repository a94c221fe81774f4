//! Tag name normalization for Linkvault.
//!
//! Tag equality is decided on the normalized name: `(owner_id,
//! normalized_name)` is unique, so "Rust", " rust " and "RUST" are the
//! same tag.

/// Normalizes a tag's display name to its comparison key: trimmed and
/// lowercased. Pure and total — never fails, and applying it twice yields
/// the same result.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}
