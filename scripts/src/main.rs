use std::process::exit;

use clap::Parser;
use murmuration_scripts::cli::Cli;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let Cli { command } = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match command.run().await {
        Ok(()) => exit(0),
        Err(e) => {
            error!("{}", e);
            exit(1)
        }
    }
}
