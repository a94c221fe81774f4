//! Property-based tests for the bulk operation executor.
//!
//! For any split of a user's bookmarks into selected and unselected sets,
//! a bulk action reports exactly the selected count and leaves every
//! unselected bookmark untouched on the mutated field.

use linkvault::database::Database;
use linkvault::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use linkvault::managers::bulk_manager::{BulkManager, BulkManagerTrait};
use linkvault::types::bookmark::NewBookmark;
use linkvault::types::bulk::BulkAction;
use proptest::prelude::*;

const OWNER: &str = "user-owner";

fn create_bookmarks(db: &Database, count: usize) -> Vec<String> {
    let mut mgr = BookmarkManager::new(db.connection());
    (0..count)
        .map(|i| {
            mgr.add_bookmark(
                OWNER,
                NewBookmark {
                    url: format!("https://example.com/item/{}", i),
                    ..Default::default()
                },
            )
            .expect("add_bookmark should succeed")
            .id
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // Favoriting a selection touches exactly the selection
    #[test]
    fn favorite_touches_only_selected_items(
        total in 2usize..10,
        selection_mask in any::<u16>(),
    ) {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let ids = create_bookmarks(&db, total);

        let selected: Vec<String> = ids
            .iter()
            .enumerate()
            .filter(|(i, _)| selection_mask & (1 << i) != 0)
            .map(|(_, id)| id.clone())
            .collect();
        prop_assume!(!selected.is_empty());

        let mut bulk = BulkManager::new(db.connection());
        let result = bulk
            .execute(OWNER, &selected, BulkAction::Favorite)
            .expect("bulk favorite should succeed");

        prop_assert_eq!(result.affected_count, selected.len());

        let mgr = BookmarkManager::new(db.connection());
        for id in &ids {
            let bookmark = mgr.get_bookmark(id, OWNER).unwrap();
            prop_assert_eq!(
                bookmark.is_favorite,
                selected.contains(id),
                "favorite flag must match selection for {}",
                id
            );
        }
    }

    // Moving a selection leaves unselected bookmarks in their collection
    #[test]
    fn move_leaves_unselected_items_in_place(
        total in 2usize..10,
        selection_mask in any::<u16>(),
    ) {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let ids = create_bookmarks(&db, total);

        use linkvault::managers::collection_manager::{CollectionManager, CollectionManagerTrait};
        let mut collections = CollectionManager::new(db.connection());
        let original = collections.ensure_default(OWNER).unwrap();
        let target = collections.create_collection(OWNER, "Target", None).unwrap();

        let selected: Vec<String> = ids
            .iter()
            .enumerate()
            .filter(|(i, _)| selection_mask & (1 << i) != 0)
            .map(|(_, id)| id.clone())
            .collect();
        prop_assume!(!selected.is_empty());

        let mut bulk = BulkManager::new(db.connection());
        let result = bulk
            .execute(
                OWNER,
                &selected,
                BulkAction::Move {
                    collection_id: target.id.clone(),
                },
            )
            .expect("bulk move should succeed");

        prop_assert_eq!(result.affected_count, selected.len());

        let mgr = BookmarkManager::new(db.connection());
        for id in &ids {
            let bookmark = mgr.get_bookmark(id, OWNER).unwrap();
            let expected = if selected.contains(id) {
                &target.id
            } else {
                &original.id
            };
            prop_assert_eq!(&bookmark.collection_id, expected);
        }
    }

    // Deleting a selection removes exactly the selection
    #[test]
    fn delete_removes_only_selected_items(
        total in 2usize..10,
        selection_mask in any::<u16>(),
    ) {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let ids = create_bookmarks(&db, total);

        let selected: Vec<String> = ids
            .iter()
            .enumerate()
            .filter(|(i, _)| selection_mask & (1 << i) != 0)
            .map(|(_, id)| id.clone())
            .collect();
        prop_assume!(!selected.is_empty());

        let mut bulk = BulkManager::new(db.connection());
        let result = bulk
            .execute(OWNER, &selected, BulkAction::Delete)
            .expect("bulk delete should succeed");

        prop_assert_eq!(result.affected_count, selected.len());

        let mgr = BookmarkManager::new(db.connection());
        for id in &ids {
            let found = mgr.get_bookmark(id, OWNER);
            prop_assert_eq!(found.is_err(), selected.contains(id));
        }
    }
}
