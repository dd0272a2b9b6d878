use anyhow::{Context, Result};
use nfl_ev::config::Config;
use nfl_ev::ev::rest::EvClient;
use nfl_ev::tui::{self, state::AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.toml";
const LOG_FILE: &str = "nfl-ev.log";

/// `--config <path>`, defaulting to ./config.toml.
fn config_path() -> PathBuf {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

#[tokio::main]
async fn main() -> Result<()> {
    // The terminal belongs to the TUI, so logs go to a file.
    let log_file = std::fs::File::create(LOG_FILE)
        .with_context(|| format!("Failed to create log file: {}", LOG_FILE))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nfl_ev=info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    Config::load_env_file();
    let path = config_path();
    let mut config = Config::load_or_default(&path)?;
    config.apply_env();

    let client = EvClient::new(&config.ev_service.base_url, config.ev_service.request_timeout())?;
    let endpoint = client.endpoint();
    tracing::info!(%endpoint, config = %path.display(), "starting");

    let mut state = AppState::new(config.defaults.clone(), endpoint.clone());
    state.push_log("INFO", format!("scoring service: {}", endpoint));

    tui::run_tui(state, Arc::new(client)).await?;

    tracing::info!("exiting");
    Ok(())
}
