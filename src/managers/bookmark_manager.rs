//! Bookmark Store for Linkvault.
//!
//! Implements `BookmarkManagerTrait` — bookmark CRUD, duplicate detection
//! keyed on the normalized URL, and filtered listing — backed by SQLite via
//! `rusqlite`.

use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::types::ToSql;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::managers::collection_manager::ensure_default_id;
use crate::services::url_normalizer::{detect_content_type, extract_domain, normalize_url};
use crate::services::tag_normalizer::normalize_tag_name;
use crate::types::bookmark::{Bookmark, BookmarkFilters, BookmarkPatch, ContentType, NewBookmark};
use crate::types::errors::BookmarkError;

/// Trait defining bookmark store operations.
pub trait BookmarkManagerTrait {
    /// Saves a new bookmark, flagging it as a duplicate if the owner already
    /// has one with the same normalized URL. Returns the stored bookmark.
    fn add_bookmark(&mut self, owner_id: &str, input: NewBookmark)
        -> Result<Bookmark, BookmarkError>;
    fn get_bookmark(&self, id: &str, owner_id: &str) -> Result<Bookmark, BookmarkError>;
    fn update_bookmark(
        &mut self,
        id: &str,
        owner_id: &str,
        patch: BookmarkPatch,
    ) -> Result<Bookmark, BookmarkError>;
    /// Deletes a bookmark along with its tag associations and annotations,
    /// in one transaction.
    fn remove_bookmark(&mut self, id: &str, owner_id: &str) -> Result<(), BookmarkError>;
    /// Filtered, paginated listing. Page numbers are 1-indexed; the limit is
    /// clamped by the caller. Returns (bookmarks, total_count).
    fn list_bookmarks(
        &self,
        owner_id: &str,
        filters: &BookmarkFilters,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Bookmark>, i64), BookmarkError>;
}

/// Bookmark store backed by a SQLite connection.
pub struct BookmarkManager<'a> {
    conn: &'a Connection,
}

const BOOKMARK_COLUMNS: &str = "id, owner_id, collection_id, url, normalized_url, title, excerpt, \
     cover_url, note, domain, content_type, is_duplicate, is_broken, is_favorite, position, \
     created_at, updated_at";

impl<'a> BookmarkManager<'a> {
    /// Creates a new `BookmarkManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn db_err(e: rusqlite::Error) -> BookmarkError {
        BookmarkError::StorageUnavailable(e.to_string())
    }

    /// Reads a single `Bookmark` row into a struct.
    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        let content_type: String = row.get(10)?;
        Ok(Bookmark {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            collection_id: row.get(2)?,
            url: row.get(3)?,
            normalized_url: row.get(4)?,
            title: row.get(5)?,
            excerpt: row.get(6)?,
            cover_url: row.get(7)?,
            note: row.get(8)?,
            domain: row.get(9)?,
            content_type: ContentType::from_str(&content_type),
            is_duplicate: row.get(11)?,
            is_broken: row.get(12)?,
            is_favorite: row.get(13)?,
            position: row.get(14)?,
            created_at: row.get(15)?,
            updated_at: row.get(16)?,
        })
    }

    /// Fetches a bookmark scoped to its owner. Ownership failures are
    /// indistinguishable from not-found.
    fn find_by_id_and_owner(
        conn: &Connection,
        id: &str,
        owner_id: &str,
    ) -> Result<Bookmark, BookmarkError> {
        conn.query_row(
            &format!(
                "SELECT {} FROM bookmarks WHERE id = ?1 AND owner_id = ?2",
                BOOKMARK_COLUMNS
            ),
            params![id, owner_id],
            Self::row_to_bookmark,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => BookmarkError::NotFound(id.to_string()),
            other => Self::db_err(other),
        })
    }

    /// Checks that a collection exists and belongs to the caller.
    fn collection_owned(
        conn: &Connection,
        collection_id: &str,
        owner_id: &str,
    ) -> Result<bool, BookmarkError> {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM collections WHERE id = ?1 AND owner_id = ?2",
                params![collection_id, owner_id],
                |row| row.get(0),
            )
            .map_err(Self::db_err)?;
        Ok(count > 0)
    }

    /// Computes the next position value for a bookmark in the given collection.
    fn next_position(conn: &Connection, collection_id: &str) -> Result<i64, BookmarkError> {
        conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM bookmarks WHERE collection_id = ?1",
            params![collection_id],
            |row| row.get(0),
        )
        .map_err(Self::db_err)
    }

    /// Appends the filter clauses and their arguments to a WHERE-fragment.
    fn apply_filters(
        owner_id: &str,
        filters: &BookmarkFilters,
        sql: &mut String,
        args: &mut Vec<Box<dyn ToSql>>,
    ) {
        if let Some(cid) = &filters.collection_id {
            sql.push_str(" AND collection_id = ?");
            args.push(Box::new(cid.clone()));
        }
        if !filters.tags.is_empty() {
            // Distinct inputs can normalize to the same tag; the HAVING bound
            // must count each tag once
            let mut names: Vec<String> =
                filters.tags.iter().map(|t| normalize_tag_name(t)).collect();
            names.sort();
            names.dedup();

            let placeholders = vec!["?"; names.len()].join(", ");
            sql.push_str(&format!(
                " AND id IN (SELECT bt.bookmark_id FROM bookmark_tags bt \
                 JOIN tags t ON t.id = bt.tag_id \
                 WHERE t.owner_id = ? AND t.normalized_name IN ({}) \
                 GROUP BY bt.bookmark_id HAVING COUNT(DISTINCT t.id) = ?)",
                placeholders
            ));
            args.push(Box::new(owner_id.to_string()));
            let count = names.len() as i64;
            for name in names {
                args.push(Box::new(name));
            }
            args.push(Box::new(count));
        }
        if let Some(ct) = filters.content_type {
            sql.push_str(" AND content_type = ?");
            args.push(Box::new(ct.as_str().to_string()));
        }
        if let Some(domain) = &filters.domain {
            sql.push_str(" AND domain = ?");
            args.push(Box::new(domain.to_lowercase()));
        }
        if let Some(fav) = filters.is_favorite {
            sql.push_str(" AND is_favorite = ?");
            args.push(Box::new(fav));
        }
        if let Some(broken) = filters.is_broken {
            sql.push_str(" AND is_broken = ?");
            args.push(Box::new(broken));
        }
        if let Some(from) = filters.date_from {
            sql.push_str(" AND created_at >= ?");
            args.push(Box::new(from));
        }
        if let Some(to) = filters.date_to {
            sql.push_str(" AND created_at <= ?");
            args.push(Box::new(to));
        }
        if let Some(search) = &filters.search {
            sql.push_str(" AND (LOWER(title) LIKE ? OR LOWER(COALESCE(excerpt, '')) LIKE ?)");
            let pattern = format!("%{}%", search.to_lowercase());
            args.push(Box::new(pattern.clone()));
            args.push(Box::new(pattern));
        }
    }
}

impl<'a> BookmarkManagerTrait for BookmarkManager<'a> {
    fn add_bookmark(
        &mut self,
        owner_id: &str,
        input: NewBookmark,
    ) -> Result<Bookmark, BookmarkError> {
        // All validation happens before the first write
        let normalized = normalize_url(&input.url)?;
        let domain = extract_domain(&normalized)?;
        let content_type = detect_content_type(&normalized, &domain);

        let tx = self.conn.unchecked_transaction().map_err(Self::db_err)?;

        let collection_id = match &input.collection_id {
            Some(cid) => {
                if !Self::collection_owned(&tx, cid, owner_id)? {
                    return Err(BookmarkError::CollectionNotFound(cid.clone()));
                }
                cid.clone()
            }
            None => ensure_default_id(&tx, owner_id).map_err(Self::db_err)?,
        };

        // Duplicate flag is decided once, at creation time
        let existing: i64 = tx
            .query_row(
                "SELECT COUNT(*) FROM bookmarks WHERE owner_id = ?1 AND normalized_url = ?2",
                params![owner_id, normalized],
                |row| row.get(0),
            )
            .map_err(Self::db_err)?;

        let id = Uuid::new_v4().to_string();
        let now = Self::now();
        let position = Self::next_position(&tx, &collection_id)?;
        let title = input.title.unwrap_or_else(|| domain.clone());

        tx.execute(
            &format!(
                "INSERT INTO bookmarks ({}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 0, 0, ?13, ?14, ?14)",
                BOOKMARK_COLUMNS
            ),
            params![
                id,
                owner_id,
                collection_id,
                input.url,
                normalized,
                title,
                input.excerpt,
                input.cover_url,
                input.note,
                domain,
                content_type.as_str(),
                existing > 0,
                position,
                now,
            ],
        )
        .map_err(Self::db_err)?;

        let bookmark = Self::find_by_id_and_owner(&tx, &id, owner_id)?;
        tx.commit().map_err(Self::db_err)?;
        Ok(bookmark)
    }

    fn get_bookmark(&self, id: &str, owner_id: &str) -> Result<Bookmark, BookmarkError> {
        Self::find_by_id_and_owner(self.conn, id, owner_id)
    }

    /// Applies a partial update. The URL is immutable; moving the bookmark
    /// validates that the target collection belongs to the caller.
    fn update_bookmark(
        &mut self,
        id: &str,
        owner_id: &str,
        patch: BookmarkPatch,
    ) -> Result<Bookmark, BookmarkError> {
        let tx = self.conn.unchecked_transaction().map_err(Self::db_err)?;
        Self::find_by_id_and_owner(&tx, id, owner_id)?;

        let now = Self::now();

        if let Some(cid) = &patch.collection_id {
            if !Self::collection_owned(&tx, cid, owner_id)? {
                return Err(BookmarkError::CollectionNotFound(cid.clone()));
            }
            let position = Self::next_position(&tx, cid)?;
            tx.execute(
                "UPDATE bookmarks SET collection_id = ?1, position = ?2 WHERE id = ?3",
                params![cid, position, id],
            )
            .map_err(Self::db_err)?;
        }

        if let Some(title) = &patch.title {
            tx.execute(
                "UPDATE bookmarks SET title = ?1 WHERE id = ?2",
                params![title, id],
            )
            .map_err(Self::db_err)?;
        }
        if let Some(excerpt) = &patch.excerpt {
            tx.execute(
                "UPDATE bookmarks SET excerpt = ?1 WHERE id = ?2",
                params![excerpt, id],
            )
            .map_err(Self::db_err)?;
        }
        if let Some(cover) = &patch.cover_url {
            tx.execute(
                "UPDATE bookmarks SET cover_url = ?1 WHERE id = ?2",
                params![cover, id],
            )
            .map_err(Self::db_err)?;
        }
        if let Some(note) = &patch.note {
            tx.execute(
                "UPDATE bookmarks SET note = ?1 WHERE id = ?2",
                params![note, id],
            )
            .map_err(Self::db_err)?;
        }
        if let Some(fav) = patch.is_favorite {
            tx.execute(
                "UPDATE bookmarks SET is_favorite = ?1 WHERE id = ?2",
                params![fav, id],
            )
            .map_err(Self::db_err)?;
        }
        if let Some(broken) = patch.is_broken {
            tx.execute(
                "UPDATE bookmarks SET is_broken = ?1 WHERE id = ?2",
                params![broken, id],
            )
            .map_err(Self::db_err)?;
        }

        tx.execute(
            "UPDATE bookmarks SET updated_at = ?1 WHERE id = ?2",
            params![now, id],
        )
        .map_err(Self::db_err)?;

        let updated = Self::find_by_id_and_owner(&tx, id, owner_id)?;
        tx.commit().map_err(Self::db_err)?;
        Ok(updated)
    }

    fn remove_bookmark(&mut self, id: &str, owner_id: &str) -> Result<(), BookmarkError> {
        let tx = self.conn.unchecked_transaction().map_err(Self::db_err)?;

        // Ownership check and cascade run in the same transaction
        Self::find_by_id_and_owner(&tx, id, owner_id)?;

        tx.execute("DELETE FROM annotations WHERE bookmark_id = ?1", params![id])
            .map_err(Self::db_err)?;
        tx.execute("DELETE FROM bookmark_tags WHERE bookmark_id = ?1", params![id])
            .map_err(Self::db_err)?;
        tx.execute("DELETE FROM bookmarks WHERE id = ?1", params![id])
            .map_err(Self::db_err)?;

        tx.commit().map_err(Self::db_err)?;
        Ok(())
    }

    fn list_bookmarks(
        &self,
        owner_id: &str,
        filters: &BookmarkFilters,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Bookmark>, i64), BookmarkError> {
        let mut where_sql = String::from(" FROM bookmarks WHERE owner_id = ?");
        let mut args: Vec<Box<dyn ToSql>> = vec![Box::new(owner_id.to_string())];
        Self::apply_filters(owner_id, filters, &mut where_sql, &mut args);

        let total: i64 = {
            let refs: Vec<&dyn ToSql> = args.iter().map(|a| a.as_ref()).collect();
            self.conn
                .query_row(&format!("SELECT COUNT(*){}", where_sql), &refs[..], |row| {
                    row.get(0)
                })
                .map_err(Self::db_err)?
        };

        let offset = (page.max(1) - 1) * limit;
        args.push(Box::new(limit));
        args.push(Box::new(offset));

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {}{} ORDER BY position, created_at LIMIT ? OFFSET ?",
                BOOKMARK_COLUMNS, where_sql
            ))
            .map_err(Self::db_err)?;

        let refs: Vec<&dyn ToSql> = args.iter().map(|a| a.as_ref()).collect();
        let rows = stmt
            .query_map(&refs[..], Self::row_to_bookmark)
            .map_err(Self::db_err)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(Self::db_err)?);
        }
        Ok((results, total))
    }
}
