//! Bulk Operation Executor for Linkvault.
//!
//! Applies one action atomically across a caller-supplied set of bookmark
//! IDs. The set is first filtered to the caller's own bookmarks — foreign
//! and unknown IDs are silently dropped, never an error — and the action
//! touches exactly the filtered set inside a single transaction.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::types::ToSql;
use rusqlite::{params, Connection};

use crate::managers::tag_manager::{TagManager, TagManagerTrait};
use crate::services::tag_normalizer::normalize_tag_name;
use crate::types::bulk::{BulkAction, BulkResult};
use crate::types::errors::{BulkError, TagError};

/// Trait defining the bulk executor.
pub trait BulkManagerTrait {
    /// Executes `action` over the caller-owned subset of `item_ids`.
    /// Fails with `NoValidItems` when nothing in the set belongs to the
    /// caller; otherwise reports exactly how many items were touched.
    fn execute(
        &mut self,
        owner_id: &str,
        item_ids: &[String],
        action: BulkAction,
    ) -> Result<BulkResult, BulkError>;
}

/// Bulk executor backed by a SQLite connection.
pub struct BulkManager<'a> {
    conn: &'a Connection,
}

impl<'a> BulkManager<'a> {
    /// Creates a new `BulkManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn db_err(e: rusqlite::Error) -> BulkError {
        BulkError::StorageUnavailable(e.to_string())
    }

    fn tag_err(e: TagError) -> BulkError {
        BulkError::StorageUnavailable(e.to_string())
    }

    /// Restricts the requested IDs to bookmarks the caller owns.
    fn filter_owned(
        conn: &Connection,
        owner_id: &str,
        item_ids: &[String],
    ) -> Result<Vec<String>, BulkError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; item_ids.len()].join(", ");
        let mut stmt = conn
            .prepare(&format!(
                "SELECT id FROM bookmarks WHERE owner_id = ? AND id IN ({})",
                placeholders
            ))
            .map_err(Self::db_err)?;

        let mut args: Vec<&dyn ToSql> = vec![&owner_id];
        for id in item_ids {
            args.push(id);
        }

        let rows = stmt
            .query_map(&args[..], |row| row.get::<_, String>(0))
            .map_err(Self::db_err)?;

        let mut filtered = Vec::new();
        for row in rows {
            filtered.push(row.map_err(Self::db_err)?);
        }
        Ok(filtered)
    }

    /// Runs `sql` once per filtered ID with the ID as the sole parameter.
    fn for_each_item(
        conn: &Connection,
        sql: &str,
        items: &[String],
    ) -> Result<(), BulkError> {
        let mut stmt = conn.prepare(sql).map_err(Self::db_err)?;
        for id in items {
            stmt.execute(params![id]).map_err(Self::db_err)?;
        }
        Ok(())
    }

    fn add_tags(
        conn: &Connection,
        owner_id: &str,
        items: &[String],
        tags: &[String],
    ) -> Result<(), BulkError> {
        let mut tag_ids = Vec::new();
        {
            let mut tag_mgr = TagManager::new(conn);
            for name in tags {
                if normalize_tag_name(name).is_empty() {
                    continue;
                }
                tag_ids.push(tag_mgr.resolve_or_create(owner_id, name).map_err(Self::tag_err)?);
            }
        }
        if tag_ids.is_empty() {
            return Err(BulkError::TagsRequired);
        }

        let mut stmt = conn
            .prepare("INSERT OR IGNORE INTO bookmark_tags (bookmark_id, tag_id) VALUES (?1, ?2)")
            .map_err(Self::db_err)?;
        for id in items {
            for tag_id in &tag_ids {
                stmt.execute(params![id, tag_id]).map_err(Self::db_err)?;
            }
        }
        Ok(())
    }

    fn remove_tags(
        conn: &Connection,
        owner_id: &str,
        items: &[String],
        tags: &[String],
    ) -> Result<(), BulkError> {
        // Unknown tag names are skipped rather than created
        let mut tag_ids: Vec<String> = Vec::new();
        for name in tags {
            let normalized = normalize_tag_name(name);
            if normalized.is_empty() {
                continue;
            }
            let resolved: Option<String> = conn
                .query_row(
                    "SELECT id FROM tags WHERE owner_id = ?1 AND normalized_name = ?2",
                    params![owner_id, normalized],
                    |row| row.get(0),
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(Self::db_err(other)),
                })?;
            if let Some(id) = resolved {
                tag_ids.push(id);
            }
        }
        if tag_ids.is_empty() {
            return Err(BulkError::TagsRequired);
        }

        let mut stmt = conn
            .prepare("DELETE FROM bookmark_tags WHERE bookmark_id = ?1 AND tag_id = ?2")
            .map_err(Self::db_err)?;
        for id in items {
            for tag_id in &tag_ids {
                stmt.execute(params![id, tag_id]).map_err(Self::db_err)?;
            }
        }
        Ok(())
    }
}

impl<'a> BulkManagerTrait for BulkManager<'a> {
    fn execute(
        &mut self,
        owner_id: &str,
        item_ids: &[String],
        action: BulkAction,
    ) -> Result<BulkResult, BulkError> {
        let tx = self.conn.unchecked_transaction().map_err(Self::db_err)?;

        // Ownership filtering happens inside the same transaction as the
        // mutation, so nothing can move between check and write.
        let filtered = Self::filter_owned(&tx, owner_id, item_ids)?;
        if filtered.is_empty() {
            return Err(BulkError::NoValidItems);
        }

        let now = Self::now();
        let affected = match &action {
            BulkAction::AddTags { tags } => {
                Self::add_tags(&tx, owner_id, &filtered, tags)?;
                filtered.len()
            }
            BulkAction::RemoveTags { tags } => {
                Self::remove_tags(&tx, owner_id, &filtered, tags)?;
                filtered.len()
            }
            BulkAction::Move { collection_id } => {
                let owned: i64 = tx
                    .query_row(
                        "SELECT COUNT(*) FROM collections WHERE id = ?1 AND owner_id = ?2",
                        params![collection_id, owner_id],
                        |row| row.get(0),
                    )
                    .map_err(Self::db_err)?;
                if owned == 0 {
                    return Err(BulkError::CollectionNotFound(collection_id.clone()));
                }

                let mut stmt = tx
                    .prepare(
                        "UPDATE bookmarks SET collection_id = ?1, updated_at = ?2 WHERE id = ?3",
                    )
                    .map_err(Self::db_err)?;
                for id in &filtered {
                    stmt.execute(params![collection_id, now, id])
                        .map_err(Self::db_err)?;
                }
                filtered.len()
            }
            BulkAction::Delete => {
                Self::for_each_item(&tx, "DELETE FROM annotations WHERE bookmark_id = ?1", &filtered)?;
                Self::for_each_item(&tx, "DELETE FROM bookmark_tags WHERE bookmark_id = ?1", &filtered)?;
                Self::for_each_item(&tx, "DELETE FROM bookmarks WHERE id = ?1", &filtered)?;
                filtered.len()
            }
            BulkAction::Favorite | BulkAction::Unfavorite => {
                let value = matches!(action, BulkAction::Favorite);
                let mut stmt = tx
                    .prepare("UPDATE bookmarks SET is_favorite = ?1, updated_at = ?2 WHERE id = ?3")
                    .map_err(Self::db_err)?;
                for id in &filtered {
                    stmt.execute(params![value, now, id]).map_err(Self::db_err)?;
                }
                filtered.len()
            }
            BulkAction::Reorder { orders } => {
                if orders.is_empty() {
                    return Err(BulkError::OrdersRequired);
                }

                let selected: HashSet<&str> = filtered.iter().map(|s| s.as_str()).collect();
                let mut applied: HashSet<&str> = HashSet::new();
                let mut stmt = tx
                    .prepare("UPDATE bookmarks SET position = ?1, updated_at = ?2 WHERE id = ?3")
                    .map_err(Self::db_err)?;
                // Pairs outside the filtered set are ignored, not an error
                for (id, position) in orders {
                    if !selected.contains(id.as_str()) {
                        continue;
                    }
                    stmt.execute(params![position, now, id]).map_err(Self::db_err)?;
                    applied.insert(id.as_str());
                }
                applied.len()
            }
        };

        tx.commit().map_err(Self::db_err)?;
        Ok(BulkResult {
            affected_count: affected,
        })
    }
}
