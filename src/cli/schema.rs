use blogql::error::Result;
use blogql::{build_blog_schema, BlogStore};

use std::sync::Arc;

/// Run the schema command: print the blog schema as SDL
pub fn run(config: Option<String>) -> Result<()> {
    let config = super::load_or_example(config.as_deref())?;
    let store = BlogStore::from_config(&config)?;
    let schema = build_blog_schema(Arc::new(store))?;

    print!("{}", schema.sdl());

    Ok(())
}
