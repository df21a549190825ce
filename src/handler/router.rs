//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, the rewrite
//! chain for GET, the static responder for everything the chain passes on,
//! and the access log line.

use crate::config::{AppState, SiteLayout};
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::rewrite::{dispatch, Rewrite};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, IF_NONE_MATCH, RANGE, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
///
/// Generic over the body type since request bodies are never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    // Bodies are never read
    let (parts, _) = req.into_parts();
    let method = &parts.method;
    let uri = &parts.uri;
    let headers = &parts.headers;

    let ctx = RequestContext {
        path: uri.path(),
        query: uri.query(),
        is_head: *method == Method::HEAD,
        if_none_match: header_string(headers, IF_NONE_MATCH),
        range_header: header_string(headers, RANGE),
    };

    let (rule, response) = match *method {
        Method::GET => route_request(&ctx, &state.site).await,
        Method::HEAD => (None, static_files::serve_path(&ctx, &state.site).await),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method} {}", ctx.path));
            (None, http::build_405_response())
        }
    };

    if state.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            ctx.path.to_string(),
        );
        entry.query = ctx.query.map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.referer = header_string(headers, REFERER);
        entry.user_agent = header_string(headers, USER_AGENT);
        entry.rewrite = rule;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry);
    }

    Ok(response)
}

/// Run the rewrite chain, falling back to plain static serving
async fn route_request(
    ctx: &RequestContext<'_>,
    site: &SiteLayout,
) -> (Option<&'static str>, Response<Full<Bytes>>) {
    match dispatch(site, ctx.path, ctx.query) {
        Some((rule, Rewrite::Serve(file))) => (
            Some(rule.name()),
            static_files::serve_rewritten(ctx, &file).await,
        ),
        Some((rule, Rewrite::Static(target))) => (
            Some(rule.name()),
            static_files::serve_file(ctx, &target).await,
        ),
        None => (None, static_files::serve_path(ctx, site).await),
    }
}

fn header_string(headers: &HeaderMap, name: hyper::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
