// Application state module
// Immutable per-process state shared by every connection task

use super::site::SiteLayout;
use super::types::Config;

/// Application state
///
/// Nothing here changes after startup; request handling never writes to it.
pub struct AppState {
    pub config: Config,
    pub site: SiteLayout,
    pub access_log: bool,
}

impl AppState {
    pub fn new(config: Config, site: SiteLayout) -> Self {
        let access_log = config.logging.access_log;
        Self {
            config,
            site,
            access_log,
        }
    }
}
