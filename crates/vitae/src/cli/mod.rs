pub mod check;
pub mod parse;
pub mod skills;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use vitae_core::config::default_config_path;
use vitae_core::Config;

#[derive(Parser)]
#[command(
    name = "vitae",
    about = "Extract contact details, skills and entities from résumés",
    version
)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "VITAE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a résumé (.pdf, .docx or .txt) and print the result as JSON
    Parse {
        /// Résumé file
        file: PathBuf,
        /// Also write the result to this file, or to parsed_resume.json inside it if a directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Load the NER model and report whether parsing is available
    Check,
    /// List the skill vocabulary in effect
    Skills,
}

/// Reads the config file and applies `VITAE_*` environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.map_or_else(default_config_path, Path::to_path_buf);

    let config = Config::load(&path)
        .with_context(|| format!("loading config from {}", path.display()))?
        .with_env_overrides()?;

    Ok(config)
}
