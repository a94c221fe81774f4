//! Unit tests for the Linkvault database layer (connection + migrations).

use linkvault::database::Database;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let expected_tables = [
        "collections",
        "bookmarks",
        "tags",
        "bookmark_tags",
        "collection_permissions",
        "annotations",
    ];

    for table in &expected_tables {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_migrations_create_indexes() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let expected_indexes = [
        "idx_collections_owner",
        "idx_collections_slug",
        "idx_collections_default",
        "idx_bookmarks_owner_nurl",
        "idx_bookmarks_collection",
        "idx_annotations_bookmark",
    ];

    for index in &expected_indexes {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name=?1",
                [index],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Index '{}' should exist after migrations", index);
    }
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    // Running migrations a second time should not fail
    let result = linkvault::database::migrations::run_all(db.connection());
    assert!(result.is_ok(), "Running migrations twice should succeed (idempotent)");
}

#[test]
fn test_schema_version_recorded() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let version = linkvault::database::migrations::get_schema_version(db.connection());
    assert_eq!(
        version,
        linkvault::database::migrations::CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_open_file_database() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let db_path = dir.path().join("linkvault.db");

    let db = Database::open(&db_path);
    assert!(db.is_ok(), "open should succeed for a file path");
    assert!(db_path.exists(), "database file should be created");
}

#[test]
fn test_share_slug_unique_constraint() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    conn.execute(
        "INSERT INTO collections (id, owner_id, title, is_public, share_slug, position, created_at, updated_at) \
         VALUES ('c1', 'u1', 'A', 1, 'slug-1', 0, 0, 0)",
        [],
    )
    .unwrap();

    // Second collection with the same slug must violate the global constraint,
    // even for a different owner
    let result = conn.execute(
        "INSERT INTO collections (id, owner_id, title, is_public, share_slug, position, created_at, updated_at) \
         VALUES ('c2', 'u2', 'B', 1, 'slug-1', 0, 0, 0)",
        [],
    );
    assert!(result.is_err(), "duplicate share_slug should be rejected");
}

#[test]
fn test_one_default_collection_per_owner() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    conn.execute(
        "INSERT INTO collections (id, owner_id, title, is_default, position, created_at, updated_at) \
         VALUES ('c1', 'u1', 'Unsorted', 1, 0, 0, 0)",
        [],
    )
    .unwrap();

    let second_default = conn.execute(
        "INSERT INTO collections (id, owner_id, title, is_default, position, created_at, updated_at) \
         VALUES ('c2', 'u1', 'Unsorted', 1, 0, 0, 0)",
        [],
    );
    assert!(second_default.is_err(), "a second default for the same owner should be rejected");

    let other_owner = conn.execute(
        "INSERT INTO collections (id, owner_id, title, is_default, position, created_at, updated_at) \
         VALUES ('c3', 'u2', 'Unsorted', 1, 0, 0, 0)",
        [],
    );
    assert!(other_owner.is_ok(), "each owner gets their own default");
}

#[test]
fn test_tag_owner_normalized_name_unique() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    conn.execute(
        "INSERT INTO tags (id, owner_id, name, normalized_name) VALUES ('t1', 'u1', 'Rust', 'rust')",
        [],
    )
    .unwrap();

    let same_owner = conn.execute(
        "INSERT INTO tags (id, owner_id, name, normalized_name) VALUES ('t2', 'u1', 'RUST', 'rust')",
        [],
    );
    assert!(same_owner.is_err(), "same owner + normalized name should be rejected");

    let other_owner = conn.execute(
        "INSERT INTO tags (id, owner_id, name, normalized_name) VALUES ('t3', 'u2', 'rust', 'rust')",
        [],
    );
    assert!(other_owner.is_ok(), "another owner may reuse the name");
}
