use linkvault::types::errors::*;

// === UrlError Tests ===

#[test]
fn url_error_invalid_display() {
    let err = UrlError::InvalidUrl("ftp://example.com".to_string());
    assert_eq!(err.to_string(), "Invalid URL: ftp://example.com");
}

#[test]
fn url_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(UrlError::InvalidUrl("x".to_string()));
    assert!(err.source().is_none());
}

// === BookmarkError Tests ===

#[test]
fn bookmark_error_display_variants() {
    assert_eq!(
        BookmarkError::InvalidUrl("not-a-url".to_string()).to_string(),
        "Invalid URL: not-a-url"
    );
    assert_eq!(
        BookmarkError::NotFound("bm-1".to_string()).to_string(),
        "Bookmark not found: bm-1"
    );
    assert_eq!(
        BookmarkError::CollectionNotFound("col-1".to_string()).to_string(),
        "Collection not found: col-1"
    );
    assert_eq!(
        BookmarkError::StorageUnavailable("disk full".to_string()).to_string(),
        "Bookmark storage unavailable: disk full"
    );
}

#[test]
fn bookmark_error_from_url_error() {
    let err: BookmarkError = UrlError::InvalidUrl("bad".to_string()).into();
    assert!(matches!(err, BookmarkError::InvalidUrl(u) if u == "bad"));
}

// === CollectionError Tests ===

#[test]
fn collection_error_display_variants() {
    assert_eq!(
        CollectionError::NotFound("col-9".to_string()).to_string(),
        "Collection not found: col-9"
    );
    assert_eq!(
        CollectionError::CannotDeleteDefault("col-0".to_string()).to_string(),
        "Cannot delete default collection: col-0"
    );
    assert_eq!(
        CollectionError::CannotRenameDefault("col-0".to_string()).to_string(),
        "Cannot rename default collection: col-0"
    );
    assert_eq!(
        CollectionError::ParentCycle("col-2".to_string()).to_string(),
        "Reparenting collection would create a cycle: col-2"
    );
    assert_eq!(
        CollectionError::SlugGenerationFailed("col-3".to_string()).to_string(),
        "Share slug generation failed for collection: col-3"
    );
}

// === TagError Tests ===

#[test]
fn tag_error_display_variants() {
    assert_eq!(
        TagError::NotFound("tag-1".to_string()).to_string(),
        "Tag not found: tag-1"
    );
    assert_eq!(
        TagError::AlreadyExists("rust".to_string()).to_string(),
        "Tag already exists: rust"
    );
    assert_eq!(
        TagError::SameTag("tag-1".to_string()).to_string(),
        "Cannot merge a tag into itself: tag-1"
    );
    assert_eq!(
        TagError::SourceNotFound("tag-2".to_string()).to_string(),
        "Merge source tag not found: tag-2"
    );
    assert_eq!(
        TagError::TargetNotFound("tag-3".to_string()).to_string(),
        "Merge target tag not found: tag-3"
    );
}

// === AccessError Tests ===

#[test]
fn access_error_display_variants() {
    assert_eq!(
        AccessError::CollectionNotFound("col-5".to_string()).to_string(),
        "Collection not found: col-5"
    );
    assert_eq!(
        AccessError::StorageUnavailable("timeout".to_string()).to_string(),
        "Permission storage unavailable: timeout"
    );
}

// === BulkError Tests ===

#[test]
fn bulk_error_display_variants() {
    assert_eq!(BulkError::NoValidItems.to_string(), "No valid items in selection");
    assert_eq!(
        BulkError::TagsRequired.to_string(),
        "At least one tag is required"
    );
    assert_eq!(
        BulkError::OrdersRequired.to_string(),
        "At least one sort order is required"
    );
    assert_eq!(
        BulkError::CollectionNotFound("col-7".to_string()).to_string(),
        "Collection not found: col-7"
    );
}
