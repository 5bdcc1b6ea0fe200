use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

mod config;

/// Alertmanager webhook receiver relaying alerts to Discord, Telegram and
/// PagerDuty.
#[derive(Parser)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yml")]
    config: PathBuf,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8090)]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %cli.config.display(), %e, "refusing to start");
            process::exit(1);
        }
    };

    if let Err(e) = webhook::run(&cli.host, cli.port, config).await {
        tracing::error!(%e, "server exited");
        process::exit(1);
    }
}
