use serde::{Deserialize, Serialize};

/// Title given to the default collection when it is created on demand.
pub const DEFAULT_COLLECTION_TITLE: &str = "Unsorted";

/// Represents a collection of bookmarks. `share_slug` is present iff
/// `is_public` and is globally unique across all users.
///
/// `is_default` marks the one undeletable collection each user owns; it is
/// set when the collection is created on demand and never changes. The
/// title alone carries no special meaning, so users may name other
/// collections "Unsorted" freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub parent_id: Option<String>,
    pub is_default: bool,
    pub is_public: bool,
    pub share_slug: Option<String>,
    pub position: i64,
    pub created_at: i64,
    pub updated_at: i64,
}
