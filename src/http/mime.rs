//! MIME type detection module
//!
//! Generic extension-to-type lookup used by the static responder and by the
//! image fallbacks that do not know the declared format of their file.

use std::path::Path;

/// Content type for bytes of unknown kind
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type of exported HTML pages
pub const HTML: &str = "text/html; charset=utf-8";

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use static_export_server::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(Some("woff2")), "font/woff2");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return OCTET_STREAM;
    };

    match ext.to_ascii_lowercase().as_str() {
        // Pages and framework payloads
        "html" | "htm" => HTML,
        "txt" => "text/plain; charset=utf-8",
        "rsc" => "text/x-component",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "xml" => "application/xml",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Media
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",

        "pdf" => "application/pdf",
        _ => OCTET_STREAM,
    }
}

/// Content type for a filesystem path or URL path
pub fn content_type_for_path(path: impl AsRef<Path>) -> &'static str {
    get_content_type(path.as_ref().extension().and_then(|e| e.to_str()))
}
