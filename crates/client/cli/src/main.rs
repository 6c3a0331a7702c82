//! Terminal entry point for the points race scorer.
mod app;
mod command;
mod config;
mod events;
mod logging;

use anyhow::Result;
use app::CliApp;
use config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    let _guard = logging::setup_logging(&config.session_id, &config.session_log_dir())?;

    CliApp::start(config).await?.run().await
}
