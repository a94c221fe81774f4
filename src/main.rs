//! Linkvault — domain core for a self-hosted bookmark manager.
//!
//! Entry point: runs a console demo exercising each manager against an
//! in-memory database. The real deployment consumes the library from an
//! HTTP layer.

use linkvault::database::Database;
use linkvault::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use linkvault::managers::bulk_manager::{BulkManager, BulkManagerTrait};
use linkvault::managers::collection_manager::{CollectionManager, CollectionManagerTrait};
use linkvault::managers::permission_manager::{PermissionManager, PermissionManagerTrait};
use linkvault::managers::tag_manager::{TagManager, TagManagerTrait};
use linkvault::types::bookmark::{BookmarkFilters, NewBookmark};
use linkvault::types::bulk::BulkAction;
use linkvault::types::permission::PermissionRole;

fn main() {
    println!();
    println!("Linkvault v{} — demo mode", env!("CARGO_PKG_VERSION"));
    println!();

    let db = Database::open_in_memory().expect("Failed to open database");
    let conn = db.connection();
    let alice = "user-alice";
    let bob = "user-bob";

    section("Bookmarks + dedup");
    let mut bookmarks = BookmarkManager::new(conn);
    let first = bookmarks
        .add_bookmark(
            alice,
            NewBookmark {
                url: "https://EXAMPLE.com:443/a/b/?utm_source=x&z=1".to_string(),
                title: Some("Example".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    println!("  saved   {} -> {}", first.url, first.normalized_url);
    let second = bookmarks
        .add_bookmark(
            alice,
            NewBookmark {
                url: "https://example.com/a/b?z=1".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    println!(
        "  saved   {} (duplicate: {})",
        second.normalized_url, second.is_duplicate
    );
    println!(
        "  {}",
        serde_json::to_string_pretty(&second).unwrap_or_default()
    );

    section("Collections + sharing");
    let mut collections = CollectionManager::new(conn);
    let reading = collections
        .create_collection(alice, "Reading List", None)
        .unwrap();
    let shared = collections.make_public(&reading.id, alice).unwrap();
    println!(
        "  '{}' public at slug {}",
        shared.title,
        shared.share_slug.as_deref().unwrap_or("-")
    );

    let mut permissions = PermissionManager::new(conn);
    permissions
        .grant_access(&reading.id, alice, bob, PermissionRole::Editor)
        .unwrap();
    let decision = permissions.check_access(&reading.id, Some(bob)).unwrap();
    println!(
        "  bob: view={} edit={}",
        decision.can_view, decision.can_edit
    );
    let anon = permissions.check_access(&reading.id, None).unwrap();
    println!("  anonymous: view={}", anon.can_view);

    section("Bulk operations");
    let mut bulk = BulkManager::new(conn);
    let ids = vec![first.id.clone(), second.id.clone()];
    let result = bulk
        .execute(
            alice,
            &ids,
            BulkAction::AddTags {
                tags: vec!["rust".to_string(), "Reading".to_string()],
            },
        )
        .unwrap();
    println!("  tagged {} bookmarks", result.affected_count);
    let moved = bulk
        .execute(
            alice,
            &ids,
            BulkAction::Move {
                collection_id: reading.id.clone(),
            },
        )
        .unwrap();
    println!("  moved {} bookmarks to '{}'", moved.affected_count, reading.title);

    section("Tag merge");
    let mut tags = TagManager::new(conn);
    let rust_id = tags.resolve_or_create(alice, "rust").unwrap();
    let rustlang_id = tags.resolve_or_create(alice, "rustlang").unwrap();
    bulk.execute(
        alice,
        &[first.id.clone()],
        BulkAction::AddTags {
            tags: vec!["rustlang".to_string()],
        },
    )
    .unwrap();
    let merged = tags.merge_tags(&rustlang_id, &rust_id, alice).unwrap();
    println!(
        "  merged 'rustlang' into 'rust': {} bookmarks now tagged",
        merged.affected_bookmark_count
    );

    section("Collection delete cascade");
    let moved = collections.delete_collection(&reading.id, alice).unwrap();
    println!("  deleted 'Reading List', {} bookmarks moved to Unsorted", moved);
    let (listed, total) = bookmarks
        .list_bookmarks(alice, &BookmarkFilters::default(), 1, 25)
        .unwrap();
    println!("  {} of {} bookmarks listed", listed.len(), total);

    println!();
    println!("Demo complete.");
}

fn section(name: &str) {
    println!("--- {} ---", name);
}
