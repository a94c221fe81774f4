// Linkvault shared type definitions
// Each submodule defines types used across the domain core.

pub mod bookmark;
pub mod bulk;
pub mod collection;
pub mod errors;
pub mod permission;
pub mod tag;
