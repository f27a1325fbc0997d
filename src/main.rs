use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rrbot_mecanum_runtime::config::RuntimeConfig;

/// Mecanum drive runtime: zenoh commands in, wheel powers out
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML file with loop, topic, input curve and wrist settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init(); // installs the subscriber globally

    let args = Args::parse();

    let config = match RuntimeConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = rrbot_mecanum_runtime::runtime::run(config).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
