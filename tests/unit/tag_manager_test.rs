//! Unit tests for the TagManager public API.
//!
//! Exercise tag CRUD keyed on the normalized name, the atomic
//! resolve-or-create, and the merge engine, using an in-memory SQLite
//! database.

use linkvault::database::Database;
use linkvault::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use linkvault::managers::bulk_manager::{BulkManager, BulkManagerTrait};
use linkvault::managers::tag_manager::{TagManager, TagManagerTrait};
use linkvault::types::bookmark::NewBookmark;
use linkvault::types::bulk::BulkAction;
use linkvault::types::errors::TagError;

const ALICE: &str = "user-alice";
const BOB: &str = "user-bob";

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

fn add_bookmark(db: &Database, owner: &str, url: &str) -> String {
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.add_bookmark(
        owner,
        NewBookmark {
            url: url.to_string(),
            ..Default::default()
        },
    )
    .unwrap()
    .id
}

fn tag_bookmarks(db: &Database, owner: &str, ids: &[String], tag: &str) {
    let mut bulk = BulkManager::new(db.connection());
    bulk.execute(
        owner,
        ids,
        BulkAction::AddTags {
            tags: vec![tag.to_string()],
        },
    )
    .unwrap();
}

#[test]
fn test_create_tag_stores_normalized_name() {
    let db = setup();
    let mut mgr = TagManager::new(db.connection());

    let tag = mgr.create_tag(ALICE, "  Rust Lang  ", Some("#f74c00")).unwrap();
    assert_eq!(tag.name, "Rust Lang");
    assert_eq!(tag.normalized_name, "rust lang");
    assert_eq!(tag.color.as_deref(), Some("#f74c00"));
}

#[test]
fn test_create_tag_rejects_case_variant_duplicates() {
    let db = setup();
    let mut mgr = TagManager::new(db.connection());

    mgr.create_tag(ALICE, "Rust", None).unwrap();
    let err = mgr.create_tag(ALICE, " RUST ", None).unwrap_err();
    assert!(matches!(err, TagError::AlreadyExists(_)));

    // Another user can use the same name
    assert!(mgr.create_tag(BOB, "rust", None).is_ok());
}

#[test]
fn test_resolve_or_create_converges_on_one_tag() {
    let db = setup();
    let mut mgr = TagManager::new(db.connection());

    let first = mgr.resolve_or_create(ALICE, "Reading").unwrap();
    let second = mgr.resolve_or_create(ALICE, " reading ").unwrap();
    assert_eq!(first, second);

    assert_eq!(mgr.list_tags(ALICE).unwrap().len(), 1);
}

#[test]
fn test_rename_tag_renormalizes_and_detects_conflicts() {
    let db = setup();
    let mut mgr = TagManager::new(db.connection());

    let tag = mgr.create_tag(ALICE, "rusty", None).unwrap();
    mgr.create_tag(ALICE, "rust", None).unwrap();

    let renamed = mgr.rename_tag(&tag.id, ALICE, "Ferrous").unwrap();
    assert_eq!(renamed.normalized_name, "ferrous");

    let err = mgr.rename_tag(&tag.id, ALICE, "RUST").unwrap_err();
    assert!(matches!(err, TagError::AlreadyExists(_)));
}

#[test]
fn test_delete_tag_cascades_associations() {
    let db = setup();
    let bm = add_bookmark(&db, ALICE, "https://example.com");
    tag_bookmarks(&db, ALICE, &[bm.clone()], "temp");

    let mut mgr = TagManager::new(db.connection());
    let tag_id = mgr.resolve_or_create(ALICE, "temp").unwrap();
    mgr.delete_tag(&tag_id, ALICE).unwrap();

    let rows: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM bookmark_tags", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
    assert!(mgr.list_tags(ALICE).unwrap().is_empty());
}

#[test]
fn test_merge_counts_union_not_sum() {
    let db = setup();

    // 2 bookmarks only on source, 1 only on target, 1 shared
    let s1 = add_bookmark(&db, ALICE, "https://example.com/s1");
    let s2 = add_bookmark(&db, ALICE, "https://example.com/s2");
    let t1 = add_bookmark(&db, ALICE, "https://example.com/t1");
    let shared = add_bookmark(&db, ALICE, "https://example.com/shared");

    tag_bookmarks(&db, ALICE, &[s1, s2, shared.clone()], "source");
    tag_bookmarks(&db, ALICE, &[t1, shared], "target");

    let mut mgr = TagManager::new(db.connection());
    let source_id = mgr.resolve_or_create(ALICE, "source").unwrap();
    let target_id = mgr.resolve_or_create(ALICE, "target").unwrap();

    let result = mgr.merge_tags(&source_id, &target_id, ALICE).unwrap();
    assert_eq!(result.affected_bookmark_count, 4, "union, not 3 + 2");

    // Source tag is gone; no duplicate association rows exist
    let tags = mgr.list_tags(ALICE).unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].normalized_name, "target");

    let rows: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM bookmark_tags WHERE tag_id = ?1",
            rusqlite::params![target_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(rows, 4);
}

#[test]
fn test_merge_rejects_same_tag() {
    let db = setup();
    let mut mgr = TagManager::new(db.connection());

    let id = mgr.resolve_or_create(ALICE, "solo").unwrap();
    let err = mgr.merge_tags(&id, &id, ALICE).unwrap_err();
    assert!(matches!(err, TagError::SameTag(_)));
}

#[test]
fn test_merge_checks_ownership_of_both_tags() {
    let db = setup();
    let mut mgr = TagManager::new(db.connection());

    let alices = mgr.resolve_or_create(ALICE, "mine").unwrap();
    let bobs = mgr.resolve_or_create(BOB, "theirs").unwrap();

    let err = mgr.merge_tags(&bobs, &alices, ALICE).unwrap_err();
    assert!(matches!(err, TagError::SourceNotFound(_)));

    let err = mgr.merge_tags(&alices, &bobs, ALICE).unwrap_err();
    assert!(matches!(err, TagError::TargetNotFound(_)));
}

#[test]
fn test_merge_with_empty_target_moves_all_associations() {
    let db = setup();
    let a = add_bookmark(&db, ALICE, "https://example.com/a");
    let b = add_bookmark(&db, ALICE, "https://example.com/b");
    tag_bookmarks(&db, ALICE, &[a, b], "old");

    let mut mgr = TagManager::new(db.connection());
    let old_id = mgr.resolve_or_create(ALICE, "old").unwrap();
    let new_id = mgr.resolve_or_create(ALICE, "new").unwrap();

    let result = mgr.merge_tags(&old_id, &new_id, ALICE).unwrap();
    assert_eq!(result.affected_bookmark_count, 2);
}
