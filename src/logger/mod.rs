//! Logger module
//!
//! Provides logging utilities for the export server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error, warning and debug logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, LogFormat};

use crate::config::{AppState, Config};
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// Whether `log_debug` output is emitted
static DEBUG: AtomicBool = AtomicBool::new(false);

/// Access log layout chosen at startup
static ACCESS_FORMAT: OnceLock<LogFormat> = OnceLock::new();

/// Initialize the logger with configuration
///
/// Call once at application startup. A second call fails with
/// `AlreadyExists` and leaves the first settings in place.
pub fn init(config: &Config) -> io::Result<()> {
    ACCESS_FORMAT
        .set(LogFormat::parse(&config.logging.access_log_format))
        .map_err(|_| io::Error::new(io::ErrorKind::AlreadyExists, "Logger already initialized"))?;
    DEBUG.store(config.is_debug(), Ordering::Relaxed);
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    let config = &state.config;
    write_info("======================================");
    write_info("Static export server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Document root: {}", state.site.root.display()));
    write_info(&format!("Image endpoint: {}", state.site.image_endpoint));
    write_info(&format!(
        "Pinned viewer: {} -> {}",
        state.site.viewer_prefix, state.site.viewer_artifact
    ));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_shutdown(addr: &SocketAddr, active_connections: usize) {
    write_info(&format!(
        "[Shutdown] Listener on {addr} closed, {active_connections} connection(s) still finishing"
    ));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

pub fn log_debug(message: &str) {
    if DEBUG.load(Ordering::Relaxed) {
        write_info(&format!("[DEBUG] {message}"));
    }
}

/// Record which rewrite rule answered a request
pub fn log_rewrite(rule: &str, path: &str, target: &Path) {
    if DEBUG.load(Ordering::Relaxed) {
        write_info(&format!("[Rewrite] {rule}: {path} -> {}", target.display()));
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry) {
    let format = ACCESS_FORMAT.get_or_init(|| LogFormat::Combined);
    write_info(&entry.render(format));
}
