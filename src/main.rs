use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use stromtarif::logging::{get_logger, init_logging};
use stromtarif::{Config, StromService};

#[derive(Debug, Parser)]
#[command(name = "stromtarif", version = env!("APP_VERSION"), about)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "STROMTARIF_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured listen address
    #[arg(long)]
    host: Option<String>,

    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.web.host = host;
    }
    if let Some(port) = args.port {
        config.web.port = port;
    }
    config.validate().context("Invalid configuration")?;

    init_logging(&config.logging).context("Failed to initialize logging")?;
    let logger = get_logger("main");
    logger.info(&format!("Stromtarif {} starting up", env!("APP_VERSION")));

    let host = config.web.host.clone();
    let port = config.web.port;
    let service = StromService::from_config(config).context("Failed to create service")?;

    if let Err(e) = stromtarif::web::serve(Arc::new(service), &host, port).await {
        logger.error(&format!("Web server error: {}", e));
        return Err(e);
    }
    Ok(())
}
