use blogql::error::{BlogqlError, Result};
use blogql::{build_blog_schema, BlogStore, Executor, Request};

use async_graphql::Variables;
use std::fs;
use std::sync::Arc;

/// Query run when none is given on the command line
pub const DEFAULT_QUERY: &str = "{ posts { id title content } }";

/// Run the query command: execute one request and print the JSON response
pub fn run(
    query: Option<String>,
    file: Option<String>,
    variables: Option<String>,
    operation: Option<String>,
    config: Option<String>,
    pretty: bool,
) -> Result<()> {
    let config = super::load_or_example(config.as_deref())?;
    let store = BlogStore::from_config(&config)?;
    let schema = build_blog_schema(Arc::new(store))?;

    let query = match (query, file) {
        (Some(query), _) => query,
        (None, Some(path)) => fs::read_to_string(&path).map_err(|e| {
            BlogqlError::Config(format!("Failed to read query file '{}': {}", path, e))
        })?,
        (None, None) => DEFAULT_QUERY.to_string(),
    };

    let mut request = Request::new(query);
    if let Some(name) = operation {
        request = request.operation_name(name);
    }
    if let Some(raw) = variables {
        request = request.variables(parse_variables(&raw)?);
    }

    let response = Executor::new(&schema)
        .with_config(config.executor)
        .execute(request);

    println!("{}", response.to_json_string(pretty)?);

    Ok(())
}

fn parse_variables(raw: &str) -> Result<Variables> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(BlogqlError::Config(
            "--variables must be a JSON object".to_string(),
        ));
    }
    Ok(Variables::from_json(value))
}
