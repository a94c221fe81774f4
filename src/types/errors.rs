use std::fmt;

// === UrlError ===

/// Errors related to URL normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum UrlError {
    /// The string does not parse as a URL, or the scheme is not http/https.
    InvalidUrl(String),
}

impl fmt::Display for UrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
        }
    }
}

impl std::error::Error for UrlError {}

// === BookmarkError ===

/// Errors related to bookmark store operations.
#[derive(Debug)]
pub enum BookmarkError {
    /// The URL is malformed or uses an unsupported scheme.
    InvalidUrl(String),
    /// Bookmark with the given ID was not found (or is not owned by the caller).
    NotFound(String),
    /// The target collection was not found (or is not owned by the caller).
    CollectionNotFound(String),
    /// The storage backend failed; the caller may retry.
    StorageUnavailable(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            BookmarkError::NotFound(id) => write!(f, "Bookmark not found: {}", id),
            BookmarkError::CollectionNotFound(id) => write!(f, "Collection not found: {}", id),
            BookmarkError::StorageUnavailable(msg) => {
                write!(f, "Bookmark storage unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for BookmarkError {}

impl From<UrlError> for BookmarkError {
    fn from(err: UrlError) -> Self {
        match err {
            UrlError::InvalidUrl(url) => BookmarkError::InvalidUrl(url),
        }
    }
}

// === CollectionError ===

/// Errors related to collection lifecycle operations.
#[derive(Debug)]
pub enum CollectionError {
    /// Collection with the given ID was not found (or is not owned by the caller).
    NotFound(String),
    /// The user's default collection cannot be deleted.
    CannotDeleteDefault(String),
    /// The user's default collection cannot be retitled.
    CannotRenameDefault(String),
    /// Reparenting would introduce a cycle in the collection tree.
    ParentCycle(String),
    /// Slug generation exhausted its retry budget against the uniqueness constraint.
    SlugGenerationFailed(String),
    /// The storage backend failed; the caller may retry.
    StorageUnavailable(String),
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::NotFound(id) => write!(f, "Collection not found: {}", id),
            CollectionError::CannotDeleteDefault(id) => {
                write!(f, "Cannot delete default collection: {}", id)
            }
            CollectionError::CannotRenameDefault(id) => {
                write!(f, "Cannot rename default collection: {}", id)
            }
            CollectionError::ParentCycle(id) => {
                write!(f, "Reparenting collection would create a cycle: {}", id)
            }
            CollectionError::SlugGenerationFailed(id) => {
                write!(f, "Share slug generation failed for collection: {}", id)
            }
            CollectionError::StorageUnavailable(msg) => {
                write!(f, "Collection storage unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for CollectionError {}

// === TagError ===

/// Errors related to tag management and tag merging.
#[derive(Debug)]
pub enum TagError {
    /// Tag with the given ID was not found (or is not owned by the caller).
    NotFound(String),
    /// A tag with the same normalized name already exists for this user.
    AlreadyExists(String),
    /// Merge source and target are the same tag.
    SameTag(String),
    /// The merge source tag was not found (or is not owned by the caller).
    SourceNotFound(String),
    /// The merge target tag was not found (or is not owned by the caller).
    TargetNotFound(String),
    /// The storage backend failed; the caller may retry.
    StorageUnavailable(String),
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagError::NotFound(id) => write!(f, "Tag not found: {}", id),
            TagError::AlreadyExists(name) => write!(f, "Tag already exists: {}", name),
            TagError::SameTag(id) => write!(f, "Cannot merge a tag into itself: {}", id),
            TagError::SourceNotFound(id) => write!(f, "Merge source tag not found: {}", id),
            TagError::TargetNotFound(id) => write!(f, "Merge target tag not found: {}", id),
            TagError::StorageUnavailable(msg) => write!(f, "Tag storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for TagError {}

// === AccessError ===

/// Errors related to collection permission checks and grants.
#[derive(Debug)]
pub enum AccessError {
    /// Collection with the given ID was not found (or is not owned by the caller).
    CollectionNotFound(String),
    /// The storage backend failed; the caller may retry.
    StorageUnavailable(String),
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::CollectionNotFound(id) => write!(f, "Collection not found: {}", id),
            AccessError::StorageUnavailable(msg) => {
                write!(f, "Permission storage unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for AccessError {}

// === BulkError ===

/// Errors related to bulk operations over bookmark sets.
#[derive(Debug)]
pub enum BulkError {
    /// None of the supplied item IDs belong to the caller.
    NoValidItems,
    /// A tag action was requested but no tag names resolved.
    TagsRequired,
    /// A reorder action was requested with an empty order list.
    OrdersRequired,
    /// The move target collection was not found (or is not owned by the caller).
    CollectionNotFound(String),
    /// The storage backend failed; the caller may retry.
    StorageUnavailable(String),
}

impl fmt::Display for BulkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkError::NoValidItems => write!(f, "No valid items in selection"),
            BulkError::TagsRequired => write!(f, "At least one tag is required"),
            BulkError::OrdersRequired => write!(f, "At least one sort order is required"),
            BulkError::CollectionNotFound(id) => write!(f, "Collection not found: {}", id),
            BulkError::StorageUnavailable(msg) => {
                write!(f, "Bulk operation storage unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for BulkError {}
