//! Linkvault — domain core for a self-hosted bookmark manager.
//!
//! Keeps bookmarks, collections, tags, and sharing permissions correct under
//! concurrent mutation: deterministic URL/tag normalization for dedup,
//! cascading collection deletion, idempotent tag merging, atomic bulk
//! operations, and role-based access derivation. Consumed as a library by an
//! HTTP or RPC layer.

pub mod database;
pub mod managers;
pub mod services;
pub mod types;
