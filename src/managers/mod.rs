// Linkvault domain managers
// Managers own the transactional operations: bookmarks, collections,
// permissions, tags, and bulk mutations over bookmark sets.

pub mod bookmark_manager;
pub mod bulk_manager;
pub mod collection_manager;
pub mod permission_manager;
pub mod tag_manager;
