//! Static export server
//!
//! Serves a statically exported web site and reproduces the URL rewrites its
//! framework would have performed at runtime: pretty URLs, query-suffixed
//! pages, a pinned viewer route and the image-optimization endpoint.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod rewrite;
pub mod server;
