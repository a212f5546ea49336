use anyhow::Result;
use clap::Parser;

use vitae::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = vitae::cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse {
            file,
            output,
            compact,
        } => vitae::cli::parse::run(&config, &file, output.as_deref(), compact).await,
        Commands::Check => vitae::cli::check::run(&config).await,
        Commands::Skills => vitae::cli::skills::run(&config),
    }
}
