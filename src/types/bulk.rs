use serde::{Deserialize, Serialize};

/// One action applied atomically to an ownership-filtered set of bookmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BulkAction {
    /// Attach every named tag (created on demand) to each selected bookmark.
    AddTags { tags: Vec<String> },
    /// Detach every named tag from each selected bookmark. Unknown names
    /// are skipped.
    RemoveTags { tags: Vec<String> },
    /// Reassign each selected bookmark to the target collection.
    Move { collection_id: String },
    /// Delete each selected bookmark, cascading tags and annotations.
    Delete,
    Favorite,
    Unfavorite,
    /// Apply explicit sort orders. Pairs whose bookmark is outside the
    /// selection are ignored.
    Reorder { orders: Vec<(String, i64)> },
}

/// Outcome of a bulk operation: how many selected items the action touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResult {
    pub affected_count: usize,
}
