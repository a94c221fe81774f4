//! Permission Engine for Linkvault.
//!
//! Derives an access level (owner / editor / viewer / none) for a principal
//! against a collection, including anonymous access to public collections.
//! Decisions always read current state; revocation is visible on the next
//! check.

use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection};

use crate::types::errors::AccessError;
use crate::types::permission::{
    AccessDecision, AccessRole, CollectionPermission, PermissionRole,
};

/// Trait defining permission operations on shared collections.
pub trait PermissionManagerTrait {
    /// Computes the access decision for a principal. `None` is an anonymous
    /// principal (reachable only through public collections).
    fn check_access(
        &self,
        collection_id: &str,
        principal: Option<&str>,
    ) -> Result<AccessDecision, AccessError>;
    /// Grants or updates a role for a user. Only the collection owner may
    /// grant; the owner themself is never stored in the permission table.
    fn grant_access(
        &mut self,
        collection_id: &str,
        owner_id: &str,
        user_id: &str,
        role: PermissionRole,
    ) -> Result<(), AccessError>;
    /// Revokes a user's grant. The next `check_access` reflects the removal.
    fn revoke_access(
        &mut self,
        collection_id: &str,
        owner_id: &str,
        user_id: &str,
    ) -> Result<(), AccessError>;
    fn list_collaborators(
        &self,
        collection_id: &str,
        owner_id: &str,
    ) -> Result<Vec<CollectionPermission>, AccessError>;
}

/// Permission engine backed by a SQLite connection.
pub struct PermissionManager<'a> {
    conn: &'a Connection,
}

impl<'a> PermissionManager<'a> {
    /// Creates a new `PermissionManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn db_err(e: rusqlite::Error) -> AccessError {
        AccessError::StorageUnavailable(e.to_string())
    }

    /// Looks up (owner_id, is_public) for a collection, if it exists.
    fn collection_meta(&self, collection_id: &str) -> Result<Option<(String, bool)>, AccessError> {
        self.conn
            .query_row(
                "SELECT owner_id, is_public FROM collections WHERE id = ?1",
                params![collection_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(Self::db_err(other)),
            })
    }

    /// Verifies the caller owns the collection before a grant/revoke/list.
    fn require_owner(&self, collection_id: &str, owner_id: &str) -> Result<(), AccessError> {
        match self.collection_meta(collection_id)? {
            Some((owner, _)) if owner == owner_id => Ok(()),
            // Not-owned looks the same as not-found to the caller
            _ => Err(AccessError::CollectionNotFound(collection_id.to_string())),
        }
    }
}

impl<'a> PermissionManagerTrait for PermissionManager<'a> {
    /// Rules, checked in order: missing collection denies; the owner has
    /// full access; a public collection grants view to anyone (anonymous
    /// included) but never edit; anonymous principals are otherwise denied;
    /// a stored grant gives view always and edit only to editors.
    fn check_access(
        &self,
        collection_id: &str,
        principal: Option<&str>,
    ) -> Result<AccessDecision, AccessError> {
        let (owner_id, is_public) = match self.collection_meta(collection_id)? {
            Some(meta) => meta,
            None => return Ok(AccessDecision::denied()),
        };

        if let Some(user_id) = principal {
            if user_id == owner_id {
                return Ok(AccessDecision {
                    has_access: true,
                    role: Some(AccessRole::Owner),
                    can_view: true,
                    can_edit: true,
                });
            }
        }

        if is_public {
            return Ok(AccessDecision {
                has_access: true,
                role: None,
                can_view: true,
                can_edit: false,
            });
        }

        let user_id = match principal {
            Some(user_id) => user_id,
            None => return Ok(AccessDecision::denied()),
        };

        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT role FROM collection_permissions WHERE collection_id = ?1 AND user_id = ?2",
                params![collection_id, user_id],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(Self::db_err(other)),
            })?;

        match stored {
            Some(role) => {
                let role = PermissionRole::from_str(&role);
                Ok(AccessDecision {
                    has_access: true,
                    role: Some(match role {
                        PermissionRole::Editor => AccessRole::Editor,
                        PermissionRole::Viewer => AccessRole::Viewer,
                    }),
                    can_view: true,
                    can_edit: role == PermissionRole::Editor,
                })
            }
            None => Ok(AccessDecision::denied()),
        }
    }

    fn grant_access(
        &mut self,
        collection_id: &str,
        owner_id: &str,
        user_id: &str,
        role: PermissionRole,
    ) -> Result<(), AccessError> {
        self.require_owner(collection_id, owner_id)?;

        // Ownership already confers full access; never store a row for it
        if user_id == owner_id {
            return Ok(());
        }

        let now = Self::now();
        let updated = self
            .conn
            .execute(
                "UPDATE collection_permissions SET role = ?1 WHERE collection_id = ?2 AND user_id = ?3",
                params![role.as_str(), collection_id, user_id],
            )
            .map_err(Self::db_err)?;

        if updated == 0 {
            self.conn
                .execute(
                    "INSERT INTO collection_permissions (collection_id, user_id, role, created_at) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![collection_id, user_id, role.as_str(), now],
                )
                .map_err(Self::db_err)?;
        }

        Ok(())
    }

    fn revoke_access(
        &mut self,
        collection_id: &str,
        owner_id: &str,
        user_id: &str,
    ) -> Result<(), AccessError> {
        self.require_owner(collection_id, owner_id)?;

        self.conn
            .execute(
                "DELETE FROM collection_permissions WHERE collection_id = ?1 AND user_id = ?2",
                params![collection_id, user_id],
            )
            .map_err(Self::db_err)?;
        Ok(())
    }

    fn list_collaborators(
        &self,
        collection_id: &str,
        owner_id: &str,
    ) -> Result<Vec<CollectionPermission>, AccessError> {
        self.require_owner(collection_id, owner_id)?;

        let mut stmt = self
            .conn
            .prepare(
                "SELECT collection_id, user_id, role, created_at FROM collection_permissions \
                 WHERE collection_id = ?1 ORDER BY created_at",
            )
            .map_err(Self::db_err)?;

        let rows = stmt
            .query_map(params![collection_id], |row| {
                let role: String = row.get(2)?;
                Ok(CollectionPermission {
                    collection_id: row.get(0)?,
                    user_id: row.get(1)?,
                    role: PermissionRole::from_str(&role),
                    created_at: row.get(3)?,
                })
            })
            .map_err(Self::db_err)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(Self::db_err)?);
        }
        Ok(results)
    }
}
