//! Tag Manager for Linkvault.
//!
//! Implements `TagManagerTrait` — tag CRUD keyed on the normalized name,
//! the atomic resolve-or-create used by the bulk executor, and the merge
//! engine that folds one tag into another without duplicating associations.

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::services::tag_normalizer::normalize_tag_name;
use crate::types::errors::TagError;
use crate::types::tag::{MergeResult, Tag};

/// Trait defining tag management operations.
pub trait TagManagerTrait {
    /// Creates a tag; the normalized name must be unique per owner.
    fn create_tag(
        &mut self,
        owner_id: &str,
        name: &str,
        color: Option<&str>,
    ) -> Result<Tag, TagError>;
    /// Returns the ID of the tag with this name, creating it if absent.
    /// A single upsert keyed on `(owner_id, normalized_name)`, so two
    /// concurrent creators of the same name converge on one tag.
    fn resolve_or_create(&mut self, owner_id: &str, name: &str) -> Result<String, TagError>;
    fn rename_tag(&mut self, id: &str, owner_id: &str, name: &str) -> Result<Tag, TagError>;
    /// Deletes a tag and all of its bookmark associations.
    fn delete_tag(&mut self, id: &str, owner_id: &str) -> Result<(), TagError>;
    fn list_tags(&self, owner_id: &str) -> Result<Vec<Tag>, TagError>;
    /// Folds `source_id` into `target_id`: bookmarks tagged with the source
    /// gain the target (no duplicate associations), then the source tag is
    /// removed. Returns the distinct bookmark count now on the target.
    fn merge_tags(
        &mut self,
        source_id: &str,
        target_id: &str,
        owner_id: &str,
    ) -> Result<MergeResult, TagError>;
}

/// Tag manager backed by a SQLite connection.
pub struct TagManager<'a> {
    conn: &'a Connection,
}

impl<'a> TagManager<'a> {
    /// Creates a new `TagManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn db_err(e: rusqlite::Error) -> TagError {
        TagError::StorageUnavailable(e.to_string())
    }

    /// Reads a single `Tag` row into a struct.
    fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
        Ok(Tag {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            name: row.get(2)?,
            normalized_name: row.get(3)?,
            color: row.get(4)?,
        })
    }

    /// Fetches a tag scoped to its owner, or `None`.
    fn find_by_id_and_owner(
        conn: &Connection,
        id: &str,
        owner_id: &str,
    ) -> Result<Option<Tag>, TagError> {
        conn.query_row(
            "SELECT id, owner_id, name, normalized_name, color FROM tags \
             WHERE id = ?1 AND owner_id = ?2",
            params![id, owner_id],
            Self::row_to_tag,
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(Self::db_err(other)),
        })
    }
}

impl<'a> TagManagerTrait for TagManager<'a> {
    fn create_tag(
        &mut self,
        owner_id: &str,
        name: &str,
        color: Option<&str>,
    ) -> Result<Tag, TagError> {
        let normalized = normalize_tag_name(name);
        let id = Uuid::new_v4().to_string();

        match self.conn.execute(
            "INSERT INTO tags (id, owner_id, name, normalized_name, color) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, owner_id, name.trim(), normalized, color],
        ) {
            Ok(_) => {}
            Err(e) if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) => {
                return Err(TagError::AlreadyExists(name.trim().to_string()));
            }
            Err(e) => return Err(Self::db_err(e)),
        }

        Self::find_by_id_and_owner(self.conn, &id, owner_id)?
            .ok_or_else(|| TagError::NotFound(id))
    }

    fn resolve_or_create(&mut self, owner_id: &str, name: &str) -> Result<String, TagError> {
        let normalized = normalize_tag_name(name);
        let id = Uuid::new_v4().to_string();

        // INSERT OR IGNORE + SELECT forms the atomic upsert on the
        // (owner_id, normalized_name) unique constraint.
        self.conn
            .execute(
                "INSERT OR IGNORE INTO tags (id, owner_id, name, normalized_name, color) \
                 VALUES (?1, ?2, ?3, ?4, NULL)",
                params![id, owner_id, name.trim(), normalized],
            )
            .map_err(Self::db_err)?;

        self.conn
            .query_row(
                "SELECT id FROM tags WHERE owner_id = ?1 AND normalized_name = ?2",
                params![owner_id, normalized],
                |row| row.get(0),
            )
            .map_err(Self::db_err)
    }

    fn rename_tag(&mut self, id: &str, owner_id: &str, name: &str) -> Result<Tag, TagError> {
        if Self::find_by_id_and_owner(self.conn, id, owner_id)?.is_none() {
            return Err(TagError::NotFound(id.to_string()));
        }

        let normalized = normalize_tag_name(name);
        match self.conn.execute(
            "UPDATE tags SET name = ?1, normalized_name = ?2 WHERE id = ?3",
            params![name.trim(), normalized, id],
        ) {
            Ok(_) => {}
            Err(e) if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) => {
                return Err(TagError::AlreadyExists(name.trim().to_string()));
            }
            Err(e) => return Err(Self::db_err(e)),
        }

        Self::find_by_id_and_owner(self.conn, id, owner_id)?
            .ok_or_else(|| TagError::NotFound(id.to_string()))
    }

    fn delete_tag(&mut self, id: &str, owner_id: &str) -> Result<(), TagError> {
        let tx = self.conn.unchecked_transaction().map_err(Self::db_err)?;

        if Self::find_by_id_and_owner(&tx, id, owner_id)?.is_none() {
            return Err(TagError::NotFound(id.to_string()));
        }

        tx.execute("DELETE FROM bookmark_tags WHERE tag_id = ?1", params![id])
            .map_err(Self::db_err)?;
        tx.execute("DELETE FROM tags WHERE id = ?1", params![id])
            .map_err(Self::db_err)?;

        tx.commit().map_err(Self::db_err)?;
        Ok(())
    }

    fn list_tags(&self, owner_id: &str) -> Result<Vec<Tag>, TagError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, owner_id, name, normalized_name, color FROM tags \
                 WHERE owner_id = ?1 ORDER BY normalized_name",
            )
            .map_err(Self::db_err)?;

        let rows = stmt
            .query_map(params![owner_id], Self::row_to_tag)
            .map_err(Self::db_err)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(Self::db_err)?);
        }
        Ok(results)
    }

    fn merge_tags(
        &mut self,
        source_id: &str,
        target_id: &str,
        owner_id: &str,
    ) -> Result<MergeResult, TagError> {
        if source_id == target_id {
            return Err(TagError::SameTag(source_id.to_string()));
        }

        let tx = self.conn.unchecked_transaction().map_err(Self::db_err)?;

        if Self::find_by_id_and_owner(&tx, source_id, owner_id)?.is_none() {
            return Err(TagError::SourceNotFound(source_id.to_string()));
        }
        if Self::find_by_id_and_owner(&tx, target_id, owner_id)?.is_none() {
            return Err(TagError::TargetNotFound(target_id.to_string()));
        }

        // Add the target to every source-tagged bookmark that lacks it
        tx.execute(
            "INSERT OR IGNORE INTO bookmark_tags (bookmark_id, tag_id) \
             SELECT bookmark_id, ?1 FROM bookmark_tags WHERE tag_id = ?2",
            params![target_id, source_id],
        )
        .map_err(Self::db_err)?;

        // Target associations now cover the union of both sets
        let affected: i64 = tx
            .query_row(
                "SELECT COUNT(DISTINCT bookmark_id) FROM bookmark_tags WHERE tag_id = ?1",
                params![target_id],
                |row| row.get(0),
            )
            .map_err(Self::db_err)?;

        tx.execute(
            "DELETE FROM bookmark_tags WHERE tag_id = ?1",
            params![source_id],
        )
        .map_err(Self::db_err)?;
        tx.execute("DELETE FROM tags WHERE id = ?1", params![source_id])
            .map_err(Self::db_err)?;

        tx.commit().map_err(Self::db_err)?;
        Ok(MergeResult {
            affected_bookmark_count: affected as usize,
        })
    }
}
