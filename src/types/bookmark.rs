use serde::{Deserialize, Serialize};

/// Content classification for a saved bookmark, derived from URL heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Link,
    Article,
    Video,
    Image,
    Document,
    Audio,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Link => "link",
            ContentType::Article => "article",
            ContentType::Video => "video",
            ContentType::Image => "image",
            ContentType::Document => "document",
            ContentType::Audio => "audio",
        }
    }

    pub fn from_str(s: &str) -> ContentType {
        match s {
            "link" => ContentType::Link,
            "video" => ContentType::Video,
            "image" => ContentType::Image,
            "document" => ContentType::Document,
            "audio" => ContentType::Audio,
            _ => ContentType::Article,
        }
    }
}

/// Represents a saved bookmark. The normalized URL is the dedup key;
/// `is_duplicate` is fixed at creation time and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub owner_id: String,
    pub collection_id: String,
    pub url: String,
    pub normalized_url: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub cover_url: Option<String>,
    pub note: Option<String>,
    pub domain: String,
    pub content_type: ContentType,
    pub is_duplicate: bool,
    pub is_broken: bool,
    pub is_favorite: bool,
    pub position: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating a bookmark. Only `url` is required; an omitted
/// collection resolves to the owner's "Unsorted" collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBookmark {
    pub url: String,
    pub collection_id: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub cover_url: Option<String>,
    pub note: Option<String>,
}

/// Partial update for an existing bookmark. `None` fields are left unchanged.
/// The URL itself is immutable after creation.
#[derive(Debug, Clone, Default)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub cover_url: Option<Option<String>>,
    pub note: Option<Option<String>>,
    pub collection_id: Option<String>,
    pub is_favorite: Option<bool>,
    pub is_broken: Option<bool>,
}

/// AND-composed listing filters. Tag names are normalized before matching;
/// a bookmark must carry every listed tag to match.
#[derive(Debug, Clone, Default)]
pub struct BookmarkFilters {
    pub collection_id: Option<String>,
    pub tags: Vec<String>,
    pub content_type: Option<ContentType>,
    pub domain: Option<String>,
    pub is_favorite: Option<bool>,
    pub is_broken: Option<bool>,
    pub date_from: Option<i64>,
    pub date_to: Option<i64>,
    pub search: Option<String>,
}
