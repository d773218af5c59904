//! kikk CLI entry point.

use anyhow::Result;
use clap::Parser;
use kikk::cli::{commands, Cli, Commands};
use kikk::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("kikk={},tower_http={}", log_level, log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Ensure data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Ask {
            video_url,
            question,
            user_id,
        } => {
            commands::run_ask(video_url, question.as_deref(), user_id.as_deref(), settings).await?;
        }

        Commands::History { limit, user_id } => {
            commands::run_history(*limit, user_id.as_deref(), settings).await?;
        }

        Commands::Transcript { video_url } => {
            commands::run_transcript(video_url, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, cli.config.as_deref(), settings)?;
        }
    }

    Ok(())
}
