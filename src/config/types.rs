// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Pending connections queued by the kernel
    pub backlog: u32,
}

/// Layout of the exported site on disk and the URLs that map onto it
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Document root holding the export
    pub root: String,
    /// Optimized-asset directory, relative to `root`
    pub asset_dir: String,
    /// Image-optimization endpoint path
    pub image_endpoint: String,
    /// Dynamic viewer route pinned to a single exported page
    pub viewer_prefix: String,
    /// Export artifact served for every path under `viewer_prefix`
    pub viewer_artifact: String,
    pub index_files: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}
