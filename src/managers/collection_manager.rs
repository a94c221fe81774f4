//! Collection Lifecycle Manager for Linkvault.
//!
//! Implements `CollectionManagerTrait` — collection CRUD, the per-user
//! default-collection guarantee, cascading deletion (bookmarks are moved,
//! never deleted), and public share-slug issuance. Backed by SQLite via
//! `rusqlite`.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ring::rand::{SecureRandom, SystemRandom};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::types::collection::{Collection, DEFAULT_COLLECTION_TITLE};
use crate::types::errors::CollectionError;

/// Random bytes drawn per slug attempt.
const SLUG_BYTES: usize = 8;
/// Fixed length of an issued share slug (base64url characters).
const SLUG_LEN: usize = 10;
/// Bounded retry budget against the global slug-uniqueness constraint.
const SLUG_MAX_ATTEMPTS: usize = 5;

/// Trait defining collection lifecycle operations.
pub trait CollectionManagerTrait {
    fn create_collection(
        &mut self,
        owner_id: &str,
        title: &str,
        parent_id: Option<&str>,
    ) -> Result<Collection, CollectionError>;
    /// Returns the user's "Unsorted" collection, creating it if absent.
    fn ensure_default(&mut self, owner_id: &str) -> Result<Collection, CollectionError>;
    fn get_collection(&self, id: &str, owner_id: &str) -> Result<Collection, CollectionError>;
    fn list_collections(&self, owner_id: &str) -> Result<Vec<Collection>, CollectionError>;
    fn update_collection(
        &mut self,
        id: &str,
        owner_id: &str,
        title: Option<&str>,
        parent_id: Option<Option<&str>>,
    ) -> Result<Collection, CollectionError>;
    /// Deletes a collection, reassigning its bookmarks to the default
    /// collection. Returns how many bookmarks were moved.
    fn delete_collection(&mut self, id: &str, owner_id: &str) -> Result<usize, CollectionError>;
    fn make_public(&mut self, id: &str, owner_id: &str) -> Result<Collection, CollectionError>;
    fn make_private(&mut self, id: &str, owner_id: &str) -> Result<Collection, CollectionError>;
    /// Resolves a public collection by its share slug (anonymous access path).
    fn find_by_slug(&self, slug: &str) -> Result<Option<Collection>, CollectionError>;
}

/// Collection manager backed by a SQLite connection.
pub struct CollectionManager<'a> {
    conn: &'a Connection,
    rng: SystemRandom,
}

const COLLECTION_COLUMNS: &str = "id, owner_id, title, parent_id, is_default, is_public, \
     share_slug, position, created_at, updated_at";

impl<'a> CollectionManager<'a> {
    /// Creates a new `CollectionManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            rng: SystemRandom::new(),
        }
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn db_err(e: rusqlite::Error) -> CollectionError {
        CollectionError::StorageUnavailable(e.to_string())
    }

    /// Reads a single `Collection` row into a struct.
    fn row_to_collection(row: &rusqlite::Row) -> rusqlite::Result<Collection> {
        Ok(Collection {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            title: row.get(2)?,
            parent_id: row.get(3)?,
            is_default: row.get(4)?,
            is_public: row.get(5)?,
            share_slug: row.get(6)?,
            position: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    /// Fetches a collection scoped to its owner. Ownership failures are
    /// indistinguishable from not-found.
    fn find_by_id_and_owner(
        conn: &Connection,
        id: &str,
        owner_id: &str,
    ) -> Result<Collection, CollectionError> {
        conn.query_row(
            &format!(
                "SELECT {} FROM collections WHERE id = ?1 AND owner_id = ?2",
                COLLECTION_COLUMNS
            ),
            params![id, owner_id],
            Self::row_to_collection,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => CollectionError::NotFound(id.to_string()),
            other => Self::db_err(other),
        })
    }

    /// Computes the next position value for a collection owned by this user.
    fn next_position(conn: &Connection, owner_id: &str) -> Result<i64, CollectionError> {
        conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM collections WHERE owner_id = ?1",
            params![owner_id],
            |row| row.get(0),
        )
        .map_err(Self::db_err)
    }

    /// Generates a random URL-safe slug of fixed length.
    fn generate_slug(&self, collection_id: &str) -> Result<String, CollectionError> {
        let mut buf = [0u8; SLUG_BYTES];
        self.rng
            .fill(&mut buf)
            .map_err(|_| CollectionError::SlugGenerationFailed(collection_id.to_string()))?;
        let mut slug = URL_SAFE_NO_PAD.encode(buf);
        slug.truncate(SLUG_LEN);
        Ok(slug)
    }

    /// Walks the ancestor chain of `parent_id` and rejects the reparenting if
    /// `id` appears in it. The visited set bounds the walk on corrupt trees.
    fn check_no_cycle(
        conn: &Connection,
        id: &str,
        parent_id: &str,
        owner_id: &str,
    ) -> Result<(), CollectionError> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = Some(parent_id.to_string());

        while let Some(node) = current {
            if node == id {
                return Err(CollectionError::ParentCycle(id.to_string()));
            }
            if !visited.insert(node.clone()) {
                break;
            }
            current = conn
                .query_row(
                    "SELECT parent_id FROM collections WHERE id = ?1 AND owner_id = ?2",
                    params![node, owner_id],
                    |row| row.get::<_, Option<String>>(0),
                )
                .map_err(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => {
                        CollectionError::NotFound(node.to_string())
                    }
                    other => Self::db_err(other),
                })?;
        }
        Ok(())
    }
}

/// Returns the ID of the user's default collection, creating it inside the
/// current transaction if it does not exist yet. The default is identified
/// by the `is_default` flag, never by title; a partial unique index keeps
/// it to one row per owner.
///
/// Shared with the bookmark store and the bulk executor so the guarantee
/// holds on every code path that assigns a bookmark to a collection.
pub(crate) fn ensure_default_id(conn: &Connection, owner_id: &str) -> rusqlite::Result<String> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM collections WHERE owner_id = ?1 AND is_default = 1",
            params![owner_id],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    conn.execute(
        "INSERT INTO collections (id, owner_id, title, parent_id, is_default, is_public, share_slug, position, created_at, updated_at) \
         VALUES (?1, ?2, ?3, NULL, 1, 0, NULL, 0, ?4, ?4)",
        params![id, owner_id, DEFAULT_COLLECTION_TITLE, now],
    )?;
    Ok(id)
}

impl<'a> CollectionManagerTrait for CollectionManager<'a> {
    /// Creates a new collection. The parent, if given, must exist and belong
    /// to the caller.
    fn create_collection(
        &mut self,
        owner_id: &str,
        title: &str,
        parent_id: Option<&str>,
    ) -> Result<Collection, CollectionError> {
        if let Some(pid) = parent_id {
            Self::find_by_id_and_owner(self.conn, pid, owner_id)?;
        }

        let id = Uuid::new_v4().to_string();
        let now = Self::now();
        let position = Self::next_position(self.conn, owner_id)?;

        self.conn
            .execute(
                "INSERT INTO collections (id, owner_id, title, parent_id, is_default, is_public, share_slug, position, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, 0, 0, NULL, ?5, ?6, ?6)",
                params![id, owner_id, title, parent_id, position, now],
            )
            .map_err(Self::db_err)?;

        Self::find_by_id_and_owner(self.conn, &id, owner_id)
    }

    fn ensure_default(&mut self, owner_id: &str) -> Result<Collection, CollectionError> {
        let id = ensure_default_id(self.conn, owner_id).map_err(Self::db_err)?;
        Self::find_by_id_and_owner(self.conn, &id, owner_id)
    }

    fn get_collection(&self, id: &str, owner_id: &str) -> Result<Collection, CollectionError> {
        Self::find_by_id_and_owner(self.conn, id, owner_id)
    }

    fn list_collections(&self, owner_id: &str) -> Result<Vec<Collection>, CollectionError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM collections WHERE owner_id = ?1 ORDER BY position",
                COLLECTION_COLUMNS
            ))
            .map_err(Self::db_err)?;

        let rows = stmt
            .query_map(params![owner_id], Self::row_to_collection)
            .map_err(Self::db_err)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(Self::db_err)?);
        }
        Ok(results)
    }

    /// Updates the title and/or parent of a collection. Reparenting is
    /// validated against cycles before any write.
    fn update_collection(
        &mut self,
        id: &str,
        owner_id: &str,
        title: Option<&str>,
        parent_id: Option<Option<&str>>,
    ) -> Result<Collection, CollectionError> {
        let tx = self.conn.unchecked_transaction().map_err(Self::db_err)?;
        let collection = Self::find_by_id_and_owner(&tx, id, owner_id)?;

        // The default collection keeps its title for the lifetime of the account
        if collection.is_default && title.is_some() {
            return Err(CollectionError::CannotRenameDefault(id.to_string()));
        }

        let now = Self::now();

        if let Some(new_parent) = parent_id {
            if let Some(pid) = new_parent {
                Self::find_by_id_and_owner(&tx, pid, owner_id)?;
                Self::check_no_cycle(&tx, id, pid, owner_id)?;
            }
            tx.execute(
                "UPDATE collections SET parent_id = ?1, updated_at = ?2 WHERE id = ?3",
                params![new_parent, now, id],
            )
            .map_err(Self::db_err)?;
        }

        if let Some(t) = title {
            tx.execute(
                "UPDATE collections SET title = ?1, updated_at = ?2 WHERE id = ?3",
                params![t, now, id],
            )
            .map_err(Self::db_err)?;
        }

        let updated = Self::find_by_id_and_owner(&tx, id, owner_id)?;
        tx.commit().map_err(Self::db_err)?;
        Ok(updated)
    }

    /// Deletes a collection, atomically moving every contained bookmark to
    /// the user's "Unsorted" collection (created in the same transaction if
    /// needed) and reparenting child collections to the deleted node's
    /// parent. Bookmarks are never deleted by this operation.
    fn delete_collection(&mut self, id: &str, owner_id: &str) -> Result<usize, CollectionError> {
        let tx = self.conn.unchecked_transaction().map_err(Self::db_err)?;

        let collection = Self::find_by_id_and_owner(&tx, id, owner_id)?;
        if collection.is_default {
            return Err(CollectionError::CannotDeleteDefault(id.to_string()));
        }

        let default_id = ensure_default_id(&tx, owner_id).map_err(Self::db_err)?;
        let now = Self::now();

        let moved = tx
            .execute(
                "UPDATE bookmarks SET collection_id = ?1, updated_at = ?2 WHERE collection_id = ?3",
                params![default_id, now, id],
            )
            .map_err(Self::db_err)?;

        tx.execute(
            "UPDATE collections SET parent_id = ?1, updated_at = ?2 WHERE parent_id = ?3",
            params![collection.parent_id, now, id],
        )
        .map_err(Self::db_err)?;

        tx.execute(
            "DELETE FROM collection_permissions WHERE collection_id = ?1",
            params![id],
        )
        .map_err(Self::db_err)?;

        tx.execute("DELETE FROM collections WHERE id = ?1", params![id])
            .map_err(Self::db_err)?;

        tx.commit().map_err(Self::db_err)?;
        Ok(moved)
    }

    /// Makes a collection public, issuing a fresh share slug. Idempotent:
    /// an already-public collection keeps its existing slug.
    fn make_public(&mut self, id: &str, owner_id: &str) -> Result<Collection, CollectionError> {
        let tx = self.conn.unchecked_transaction().map_err(Self::db_err)?;

        let collection = Self::find_by_id_and_owner(&tx, id, owner_id)?;
        if collection.is_public {
            return Ok(collection);
        }

        let now = Self::now();
        let mut issued = false;
        for _ in 0..SLUG_MAX_ATTEMPTS {
            let slug = self.generate_slug(id)?;
            match tx.execute(
                "UPDATE collections SET is_public = 1, share_slug = ?1, updated_at = ?2 WHERE id = ?3",
                params![slug, now, id],
            ) {
                Ok(_) => {
                    issued = true;
                    break;
                }
                // Collision against the global slug uniqueness constraint: retry
                Err(e) if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) => {
                    continue;
                }
                Err(e) => return Err(Self::db_err(e)),
            }
        }

        if !issued {
            return Err(CollectionError::SlugGenerationFailed(id.to_string()));
        }

        let updated = Self::find_by_id_and_owner(&tx, id, owner_id)?;
        tx.commit().map_err(Self::db_err)?;
        Ok(updated)
    }

    /// Makes a collection private again, clearing the public flag and the
    /// share slug together.
    fn make_private(&mut self, id: &str, owner_id: &str) -> Result<Collection, CollectionError> {
        let affected = self
            .conn
            .execute(
                "UPDATE collections SET is_public = 0, share_slug = NULL, updated_at = ?1 \
                 WHERE id = ?2 AND owner_id = ?3",
                params![Self::now(), id, owner_id],
            )
            .map_err(Self::db_err)?;

        if affected == 0 {
            return Err(CollectionError::NotFound(id.to_string()));
        }
        Self::find_by_id_and_owner(self.conn, id, owner_id)
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Collection>, CollectionError> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM collections WHERE share_slug = ?1 AND is_public = 1",
                    COLLECTION_COLUMNS
                ),
                params![slug],
                Self::row_to_collection,
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(Self::db_err(other)),
            })
    }
}
