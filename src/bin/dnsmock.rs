//! `dnsmock`: runs the Route53 emulator.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use dnsmock::config::EmulatorConfig;
use dnsmock::logging::init_logging;
use dnsmock::server::EmulatorServer;

#[derive(Parser, Debug)]
#[command(name = "dnsmock")]
#[command(about = "In-memory Route53 API emulator", version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:4580
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = EmulatorConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level.to_ascii_lowercase();
    }
    if args.json_logs {
        config.logging.json = true;
    }
    config.validate()?;

    init_logging(&config.logging)?;
    tracing::debug!(?config, "configuration loaded");

    EmulatorServer::new(config).run().await?;
    Ok(())
}
