//! Static file serving module
//!
//! The default responder: serves whatever the request path names under the
//! document root, with directory index files, `ETag` revalidation and byte
//! ranges. Rewrite rules hand their resolved files to the same code.

use crate::config::SiteLayout;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, CachePolicy, FileMeta, RangeOutcome};
use crate::logger;
use crate::rewrite::{resolve_path, ServedFile};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve the request path as-is
pub async fn serve_path(ctx: &RequestContext<'_>, site: &SiteLayout) -> Response<Full<Bytes>> {
    let target = resolve_path(&site.root, ctx.path);

    if target.is_dir() {
        if !ctx.path.ends_with('/') {
            let location = match ctx.query {
                Some(q) => format!("{}/?{q}", ctx.path),
                None => format!("{}/", ctx.path),
            };
            return http::build_redirect_response(&location, 301);
        }
        return match find_index(&target, &site.index_files) {
            Some(index) => serve_file(ctx, &index).await,
            None => http::build_404_response(),
        };
    }

    serve_file(ctx, &target).await
}

/// Serve one resolved file with static caching, `ETag` and Range support
pub async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    let Some(content) = load_file(path).await else {
        return http::build_404_response();
    };

    let etag = cache::generate_etag(&content);
    let meta = FileMeta {
        content_type: mime::content_type_for_path(path),
        etag: &etag,
        cache: Some(CachePolicy::default()),
        ranges: true,
    };

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag, meta.cache);
    }

    let total_size = content.len();
    match http::evaluate_range(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Partial { start, end } => {
            let body = Bytes::from(content).slice(start..=end);
            http::response::build_partial_response(body, &meta, start, end, total_size, ctx.is_head)
        }
        RangeOutcome::Unsatisfiable => http::build_416_response(total_size),
        RangeOutcome::Full => {
            http::response::build_file_response(Bytes::from(content), &meta, ctx.is_head)
        }
    }
}

/// Serve a file picked by a rewrite rule with the headers the rule dictates
pub async fn serve_rewritten(ctx: &RequestContext<'_>, file: &ServedFile) -> Response<Full<Bytes>> {
    let Some(content) = load_file(&file.path).await else {
        return http::build_404_response();
    };

    let etag = cache::generate_etag(&content);
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag, file.cache);
    }

    let meta = FileMeta {
        content_type: file.content_type,
        etag: &etag,
        cache: file.cache,
        ranges: false,
    };
    http::response::build_file_response(Bytes::from(content), &meta, ctx.is_head)
}

fn find_index(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    index_files
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Read a whole file; a missing file is a quiet miss, anything else is logged
async fn load_file(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path).await {
        Ok(content) => Some(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            None
        }
    }
}
