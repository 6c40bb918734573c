use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

pub(crate) mod config;
pub(crate) mod database;
pub(crate) mod error;
pub(crate) mod models;
pub(crate) mod server;
pub(crate) mod storage;

#[cfg(test)]
mod tests;

#[derive(Debug, Parser)]
struct Args {
    /// Path to the yaml configuration file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = AppConfig::from_yaml_file(args.config)?;
    server::run_all(&config).await?;

    Ok(())
}
