//! HTTP response building module
//!
//! Builders for every status the server emits. None of them panic: a builder
//! error is logged and replaced with an empty response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::cache::CachePolicy;

/// Header values shared by full and partial file responses
#[derive(Debug, Clone, Copy)]
pub struct FileMeta<'a> {
    pub content_type: &'a str,
    pub etag: &'a str,
    pub cache: Option<CachePolicy>,
    /// Advertise `Accept-Ranges: bytes`
    pub ranges: bool,
}

/// Build 200 OK response carrying a whole file
pub fn build_file_response(data: Bytes, meta: &FileMeta<'_>, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", meta.content_type)
        .header("Content-Length", content_length)
        .header("ETag", meta.etag);
    if meta.ranges {
        builder = builder.header("Accept-Ranges", "bytes");
    }
    if let Some(cache) = meta.cache {
        builder = builder.header("Cache-Control", cache.to_header_value());
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 206 Partial Content response; `data` is already sliced to `start..=end`
pub fn build_partial_response(
    data: Bytes,
    meta: &FileMeta<'_>,
    start: usize,
    end: usize,
    total_size: usize,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = end - start + 1;
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(206)
        .header("Content-Type", meta.content_type)
        .header("Content-Length", content_length)
        .header("Content-Range", format!("bytes {start}-{end}/{total_size}"))
        .header("Accept-Ranges", "bytes")
        .header("ETag", meta.etag);
    if let Some(cache) = meta.cache {
        builder = builder.header("Cache-Control", cache.to_header_value());
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("206", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, cache: Option<CachePolicy>) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(304).header("ETag", etag);
    if let Some(cache) = cache {
        builder = builder.header("Cache-Control", cache.to_header_value());
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("304", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build redirect response (301 for directory slash redirects)
pub fn build_redirect_response(location: &str, code: u16) -> Response<Full<Bytes>> {
    Response::builder()
        .status(code)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("redirect", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    text_response(404, "404 Not Found", None)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    text_response(405, "405 Method Not Allowed", Some(("Allow", "GET, HEAD".to_string())))
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> Response<Full<Bytes>> {
    text_response(
        416,
        "416 Range Not Satisfiable",
        Some(("Content-Range", format!("bytes */{file_size}"))),
    )
}

fn text_response(
    status: u16,
    message: &'static str,
    extra: Option<(&'static str, String)>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Content-Length", message.len());
    if let Some((name, value)) = extra {
        builder = builder.header(name, value);
    }

    builder
        .body(Full::new(Bytes::from_static(message.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(Full::new(Bytes::from_static(message.as_bytes())))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
