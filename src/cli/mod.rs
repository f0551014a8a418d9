pub mod init;
pub mod query;
pub mod schema;

use blogql::config::{self, Config};
use blogql::error::Result;

/// Load configuration from `path`, or fall back to the sample blog
pub fn load_or_example(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            config::load_config(path)
        }
        None => {
            tracing::debug!("No config given, using the sample blog");
            Ok(Config::example())
        }
    }
}
