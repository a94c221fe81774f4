use serde::{Deserialize, Serialize};

/// Represents a user-owned tag. `(owner_id, normalized_name)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub normalized_name: String,
    pub color: Option<String>,
}

/// Outcome of folding one tag into another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeResult {
    /// Distinct bookmarks associated with the target after the merge:
    /// the size of the union of the two association sets, not their sum.
    pub affected_bookmark_count: usize,
}
