use anyhow::Result;
use vitae_core::{Config, ResumeParser};

pub async fn run(config: &Config) -> Result<()> {
    let parser = ResumeParser::from_config(config).await?;

    println!("model: {}", parser.model_name());
    println!("skills: {}", parser.skills().vocabulary().len());
    println!("match mode: {}", parser.skills().mode());
    eprintln!("Ready to parse");

    Ok(())
}
