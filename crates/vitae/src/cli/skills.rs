use anyhow::Result;
use vitae_core::Config;

pub fn run(config: &Config) -> Result<()> {
    let vocabulary = config.skills.vocabulary();

    for skill in vocabulary.iter() {
        println!("{skill}");
    }
    eprintln!(
        "{} skills, {} matching",
        vocabulary.len(),
        config.skills.match_mode
    );

    Ok(())
}
