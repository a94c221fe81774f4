// Linkvault pure services
// Deterministic transforms with no storage access: URL and tag-name
// canonicalization plus content-type heuristics.

pub mod tag_normalizer;
pub mod url_normalizer;
