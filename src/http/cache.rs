//! HTTP cache control module
//!
//! Provides `ETag` generation, conditional request handling and the
//! `Cache-Control` policies attached to served files.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// One year, the lifetime given to pre-rendered image variants
pub const IMMUTABLE_MAX_AGE: u32 = 31_536_000;

/// Lifetime of ordinary static files
pub const STATIC_MAX_AGE: u32 = 3600;

/// Generate `ETag` from file content
///
/// `DefaultHasher::new()` uses fixed keys, so unchanged files keep their tag
/// for the life of the binary.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Accepts a single tag, a comma separated list, or `*`.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .map(str::trim)
            .any(|e| e == etag || e == "*")
    })
}

/// Cache-Control policy of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// Content addressed by its URL never changes
    Immutable,
}

impl CachePolicy {
    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::Immutable => format!("public, max-age={IMMUTABLE_MAX_AGE}, immutable"),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Public(STATIC_MAX_AGE)
    }
}
