// Configuration module entry point
// Layered configuration, the on-disk site layout and shared request state

mod site;
mod state;
mod types;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use std::net::SocketAddr;

// Re-export public types
pub use site::SiteLayout;
pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig, SiteConfig};

/// Default listening port of the export server
pub const DEFAULT_PORT: u16 = 5174;

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// Sources, later wins: built-in defaults, the config file if present,
    /// `EXPORT_`-prefixed environment variables (`EXPORT_SERVER__PORT=8080`).
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        defaults()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("EXPORT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Configuration made of built-in defaults only
    pub fn defaults() -> Result<Self, ConfigError> {
        defaults()?.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Resolve the `site` section against the filesystem
    pub fn site_layout(&self) -> std::io::Result<SiteLayout> {
        SiteLayout::from_config(&self.site)
    }

    pub fn is_debug(&self) -> bool {
        self.logging.level.eq_ignore_ascii_case("debug")
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", DEFAULT_PORT)?
        .set_default("server.backlog", 128)?
        .set_default("site.root", ".")?
        .set_default("site.asset_dir", "_next")?
        .set_default("site.image_endpoint", "/_next/image")?
        .set_default("site.viewer_prefix", "/bouquet/")?
        .set_default("site.viewer_artifact", "bouquet?mode=color.html")?
        .set_default("site.index_files", vec!["index.html", "index.htm"])?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)
}
