//! Query repair for exported image URLs
//!
//! The static exporter writes image-optimizer URLs into pages with a few
//! recurring defects: HTML-escaped ampersands, a second `srcset` URL glued
//! onto the first, and a mangled `&w=` separator. Each defect has its own
//! named repair step below; inputs without them pass through untouched.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Left behind where a second image URL was concatenated onto the first
const CONCATENATED_FRAGMENT_MARKER: &str = "amp;q_next/image%3F";

/// Remainder of an HTML-escaped `&amp;`
const ESCAPED_AMPERSAND: &str = "amp;";

/// Tail of a broken `&amp;w=` separator
const BROKEN_WIDTH_SEPARATOR: &str = "p;w=";

/// Bytes kept literal in the names of exported `image?<query>` files
const EXPORT_QUERY_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Parsed image-endpoint parameters
///
/// Keys keep their first-seen order, which is also the order of the
/// exported file names. Repeated keys collect every value; lookups use the
/// first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageParams {
    entries: Vec<(String, Vec<String>)>,
}

impl ImageParams {
    /// Parse an `application/x-www-form-urlencoded` query, keeping blank values
    pub fn parse(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            params.push(key.into_owned(), value.into_owned());
        }
        params
    }

    fn push(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First value of `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// Copy with `key` holding the single value `value`, position unchanged
    ///
    /// `None` when `key` is absent.
    pub fn with_value(&self, key: &str, value: &str) -> Option<Self> {
        let mut params = self.clone();
        let (_, values) = params.entries.iter_mut().find(|(k, _)| k == key)?;
        *values = vec![value.to_string()];
        Some(params)
    }

    /// Canonical query string: first value of every key, in order
    ///
    /// Space becomes `+` and everything outside `A-Za-z0-9_.-~` is
    /// percent-encoded, matching how the exporter names its files.
    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .filter_map(|(key, values)| values.first().map(|value| (key, value)))
            .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Repair a raw image query and parse it
///
/// Returns `None` when nothing parseable is left, meaning the request is not
/// an image-endpoint request.
pub fn normalize_query(raw: &str) -> Option<ImageParams> {
    let decoded = decode_once(raw);
    let repaired = repair_width_separator(&unescape_ampersands(truncate_concatenated_fragment(
        &decoded,
    )));

    let params = ImageParams::parse(&repaired);
    if params.is_empty() {
        None
    } else {
        Some(params)
    }
}

fn decode_once(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

fn truncate_concatenated_fragment(query: &str) -> &str {
    query
        .split_once(CONCATENATED_FRAGMENT_MARKER)
        .map_or(query, |(first, _)| first)
}

fn unescape_ampersands(query: &str) -> String {
    query.replace(ESCAPED_AMPERSAND, "&")
}

fn repair_width_separator(query: &str) -> String {
    query.replace(BROKEN_WIDTH_SEPARATOR, "&w=")
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, EXPORT_QUERY_SAFE)
        .to_string()
        .replace("%20", "+")
}
