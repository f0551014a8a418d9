use blogql::config::{self, Config};
use blogql::error::Result;

/// Run the init command: write the sample blog as a TOML configuration
pub fn run(output: Option<String>) -> Result<()> {
    let config = Config::example();

    tracing::info!(
        "Generating example configuration with {} authors and {} posts",
        config.author.len(),
        config.post.len()
    );

    match output {
        Some(path) => {
            config::save_config(&config, &path)?;
            tracing::info!("Wrote example configuration to {}", path);
        }
        None => print!("{}", config::to_toml(&config)?),
    }

    Ok(())
}
