//! URL normalization for Linkvault.
//!
//! Produces the canonical form of a URL used as the duplicate-detection key,
//! plus domain extraction and content-type heuristics derived from it.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

use crate::types::bookmark::ContentType;
use crate::types::errors::UrlError;

/// Query parameter keys that are always stripped (exact, lowercased match).
const TRACKING_PARAMS: &[&str] = &[
    "fbclid",
    "gclid",
    "gclsrc",
    "dclid",
    "msclkid",
    "mc_cid",
    "mc_eid",
    "igshid",
    "yclid",
    "twclid",
    "vero_id",
    "wickedid",
    "mkt_tok",
    "oly_anon_id",
    "oly_enc_id",
    "ref_src",
    "ref_url",
    "spm",
    "_hsenc",
    "_hsmi",
    "_openstat",
];

/// Query parameter key prefixes that are always stripped (lowercased match).
const TRACKING_PREFIXES: &[&str] = &["utm_", "fb_", "hsa_"];

/// Characters percent-encoded when re-encoding a decoded path segment.
/// Includes '%' and '/' so that decode-then-encode is a bijection on segments.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/')
    .add(b'\\');

const VIDEO_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "twitch.tv",
    "dailymotion.com",
];
const AUDIO_DOMAINS: &[&str] = &["spotify.com", "soundcloud.com", "bandcamp.com"];
const IMAGE_DOMAINS: &[&str] = &["imgur.com", "flickr.com", "500px.com", "unsplash.com"];

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "avi", "mkv", "m4v"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "aac"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "epub"];

/// Whether a query parameter key identifies a tracking parameter.
fn is_tracking_param(key: &str) -> bool {
    let key = key.to_lowercase();
    TRACKING_PARAMS.contains(&key.as_str())
        || TRACKING_PREFIXES.iter().any(|p| key.starts_with(p))
}

/// Normalizes a URL to its canonical form for storage and duplicate comparison.
///
/// Steps, in order: lowercase scheme and host (the parser does this), drop
/// default ports, remove tracking query parameters, sort the remaining
/// parameters by key (stable, so repeated keys keep their relative order),
/// strip a single trailing slash unless the path is exactly `/`, collapse
/// equivalent percent-encodings in each path segment, and drop the fragment.
///
/// The result is idempotent and insensitive to the input's query ordering.
///
/// # Errors
/// Returns `UrlError::InvalidUrl` if the string does not parse or the scheme
/// is not http/https.
pub fn normalize_url(raw: &str) -> Result<String, UrlError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|_| UrlError::InvalidUrl(raw.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidUrl(raw.to_string()));
    }
    if url.host_str().is_none() {
        return Err(UrlError::InvalidUrl(raw.to_string()));
    }

    // Default ports (80/http, 443/https) are already dropped by the parser;
    // url.port() only reports non-default ports.

    // Filter tracking parameters, then stable-sort by key.
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.retain(|(k, _)| !is_tracking_param(k));
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        let mut serializer = url.query_pairs_mut();
        serializer.clear();
        serializer.extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        serializer.finish();
    }

    url.set_path(&normalize_path(url.path()));
    url.set_fragment(None);

    Ok(url.to_string())
}

/// Strips one trailing slash (unless the path is `/`) and collapses each
/// segment's percent-encoding to a single canonical representation.
fn normalize_path(path: &str) -> String {
    if path == "/" {
        return path.to_string();
    }

    let trimmed = path.strip_suffix('/').unwrap_or(path);
    let mut out = String::with_capacity(trimmed.len());
    for segment in trimmed.split('/').skip(1) {
        out.push('/');
        let decoded = percent_decode_str(segment).decode_utf8_lossy();
        out.push_str(&utf8_percent_encode(&decoded, PATH_SEGMENT).to_string());
    }

    if out.is_empty() {
        "/".to_string()
    } else {
        out
    }
}

/// Returns the lowercased host of a URL with a single leading `www.` stripped.
///
/// # Errors
/// Returns `UrlError::InvalidUrl` if the string does not parse or has no host.
pub fn extract_domain(raw: &str) -> Result<String, UrlError> {
    let url = Url::parse(raw.trim()).map_err(|_| UrlError::InvalidUrl(raw.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| UrlError::InvalidUrl(raw.to_string()))?
        .to_lowercase();
    Ok(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// Classifies a URL using fixed domain and file-extension heuristics.
/// Falls back to `Article` when nothing matches.
pub fn detect_content_type(url: &str, domain: &str) -> ContentType {
    if matches_domain(domain, VIDEO_DOMAINS) {
        return ContentType::Video;
    }
    if matches_domain(domain, AUDIO_DOMAINS) {
        return ContentType::Audio;
    }
    if matches_domain(domain, IMAGE_DOMAINS) {
        return ContentType::Image;
    }

    if let Some(ext) = path_extension(url) {
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            return ContentType::Video;
        }
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return ContentType::Image;
        }
        if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            return ContentType::Audio;
        }
        if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            return ContentType::Document;
        }
    }

    ContentType::Article
}

/// Whether `domain` is one of `candidates` or a subdomain of one.
fn matches_domain(domain: &str, candidates: &[&str]) -> bool {
    candidates
        .iter()
        .any(|c| domain == *c || domain.ends_with(&format!(".{}", c)))
}

/// Lowercased file extension of the URL path's final segment, if any.
fn path_extension(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last = parsed.path_segments()?.last()?.to_lowercase();
    let (_, ext) = last.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_string())
    }
}
