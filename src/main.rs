use std::path::PathBuf;

use clap::Parser;

use api_starter::config::{load_config, Overrides};
use api_starter::lifecycle::startup;
use api_starter::observability::logging;

#[derive(Parser)]
#[command(name = "api-starter")]
#[command(about = "Minimal HTTP API starter service", long_about = None)]
struct Cli {
    /// Optional TOML config file.
    #[arg(short, long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Port to listen on [default: 5000]
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Public base URL [default: http://localhost:5000]
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env first so clap sees its values as environment
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(
        cli.config.as_deref(),
        Overrides {
            port: cli.port,
            base_url: cli.base_url,
        },
    )?;

    logging::init(&config.observability);

    tracing::info!(
        port = config.port,
        base_url = %config.base_url,
        upstream = %config.upstream.url,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
