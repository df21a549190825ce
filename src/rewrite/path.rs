//! Request path to filesystem path translation
//!
//! Every filesystem probe made while routing goes through [`join_within`] or
//! [`join_verbatim`], so no request, query string or image parameter can name
//! a file outside the document root. Traversal is not rejected; it is
//! normalized away and the request degrades into an ordinary miss.

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Resolve a URL path against the document root
///
/// Query and fragment suffixes are cut, the rest is percent-decoded and
/// joined below `root`. A trailing `/` selects the directory's `index.html`
/// when one exists. The result may not exist; that is the caller's concern.
pub fn resolve_path(root: &Path, url_path: &str) -> PathBuf {
    let path = strip_query_and_fragment(url_path);
    let resolved = join_within(root, &decode_path(path));

    if path.ends_with('/') {
        let index = resolved.join("index.html");
        if index.is_file() {
            return index;
        }
    }
    resolved
}

/// Join a `/`-separated relative path below `root`
///
/// Segments lose `:` and `\` first, so neither drive prefixes nor
/// backslash separators survive. Empty and `.` segments are skipped and
/// `..` drops the previous segment but never climbs above `root`.
pub fn join_within(root: &Path, relative: &str) -> PathBuf {
    let mut segments: Vec<String> = Vec::new();
    for raw in relative.split('/') {
        let segment = sanitize_segment(raw);
        match segment.as_str() {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(segments);
    resolved
}

/// Join an exact file name below `root`
///
/// `.` and `..` collapse as in [`join_within`], but no segment is rewritten.
/// A segment the platform would not read as one plain file name (a drive
/// prefix, an embedded separator) yields `None` instead.
pub fn join_verbatim(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ if is_plain_name(segment) => segments.push(segment),
            _ => return None,
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(segments);
    Some(resolved)
}

/// Percent-decode a URL path, replacing invalid UTF-8
pub fn decode_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// Whether the last segment of a URL path carries a file extension
///
/// Leading dots of the segment do not count (`/.well-known` has none).
pub fn has_extension(url_path: &str) -> bool {
    let name = url_path.rsplit('/').next().unwrap_or_default();
    name.trim_start_matches('.').contains('.')
}

fn strip_query_and_fragment(path: &str) -> &str {
    path.find(['?', '#']).map_or(path, |end| &path[..end])
}

fn is_plain_name(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == segment
    )
}

fn sanitize_segment(segment: &str) -> String {
    segment.replace([':', '\\'], "")
}
