use std::net::SocketAddr;

use clap::Parser;
use eyre::{Result, WrapErr};
use log::{debug, info, warn};

mod cli;

use cli::Cli;

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    // Load config file (non-fatal if missing/invalid)
    let loaded = match cli.config {
        Some(ref path) => artx::config::Config::load_from(path),
        None => artx::config::Config::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        warn!("Ignoring config file: {e}");
        artx::config::Config::default()
    });

    let settings = cli.settings(&config);
    debug!(
        "Model: {}, transcript budget: {} chars",
        settings.model, settings.max_transcript_chars
    );
    if settings.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set; article and quote requests will fail");
    }
    if settings.transcript_api_key.is_none() || settings.transcript_host.is_none() {
        warn!("RAPIDAPI_KEY or RAPIDAPI_HOST not set; transcript requests will fail");
    }

    let state = artx::server::AppState::from_settings(reqwest::Client::new(), &settings);
    let app = artx::server::router(state);

    let addr: SocketAddr = format!("{}:{}", cli.bind, settings.port)
        .parse()
        .wrap_err_with(|| format!("invalid bind address {}:{}", cli.bind, settings.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;

    info!("Listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
