pub mod config;
pub mod data;
pub mod error;
pub mod executor;
pub mod schema;

// Re-export commonly used types
pub use config::{Config, ExecutorConfig};
pub use data::{Author, BlogStore, Post};
pub use error::{BlogqlError, Result};
pub use executor::{Executor, QueryError, Request, Response};
pub use schema::{build_blog_schema, Schema, SchemaBuilder};
