use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use static_export_server::config::{AppState, Config};
use static_export_server::logger;
use static_export_server::server::{
    create_reusable_listener, start_server_loop, start_signal_handler, SignalHandler,
};

/// Config file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, honouring the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let site = cfg.site_layout()?;
    let listener = create_reusable_listener(addr, cfg.server.backlog)?;

    let state = Arc::new(AppState::new(cfg, site));
    let active_connections = Arc::new(AtomicUsize::new(0));

    logger::log_server_start(&addr, &state);

    let signals = SignalHandler::new();
    start_signal_handler(&signals);

    start_server_loop(listener, state, active_connections, Arc::clone(&signals.shutdown)).await?;
    Ok(())
}
