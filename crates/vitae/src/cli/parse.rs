use std::path::Path;

use anyhow::{bail, Result};
use vitae_core::{Config, ResumeParser};

pub async fn run(config: &Config, file: &Path, output: Option<&Path>, compact: bool) -> Result<()> {
    if !file.exists() {
        bail!("file not found: {}", file.display());
    }
    if !file.is_file() {
        bail!("not a regular file: {}", file.display());
    }

    let parser = ResumeParser::from_config(config).await?;
    let result = parser.parse_file(file).await?;

    let json = if compact {
        result.to_json()?
    } else {
        result.to_json_pretty()?
    };
    println!("{json}");

    if let Some(target) = output {
        let written = result.export(target).await?;
        eprintln!("Exported: {}", written.display());
    }

    Ok(())
}
