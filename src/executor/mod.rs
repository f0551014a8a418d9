/// Query execution
///
/// Each call runs an independent parse → validate → resolve → assemble
/// pipeline. Parse and validation failures produce `data: null`; resolver
/// failures only null out the affected field.

mod resolve;
mod response;
mod validate;

pub use response::{ErrorKind, Location, PathSegment, QueryError, Response};
pub use validate::{coerce, FieldPlan, PlanKind};

use crate::config::ExecutorConfig;
use crate::schema::Schema;

use async_graphql::parser::parse_query;
use async_graphql::parser::types::{
    DocumentOperations, ExecutableDocument, OperationDefinition, OperationType,
};
use async_graphql::parser::{Pos, Positioned};
use async_graphql::Variables;

/// A query request
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub query: String,
    pub operation_name: Option<String>,
    pub variables: Variables,
}

impl Request {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }
}

impl From<&str> for Request {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

impl From<String> for Request {
    fn from(query: String) -> Self {
        Self::new(query)
    }
}

/// Executes requests against a schema
#[derive(Debug, Clone, Copy)]
pub struct Executor<'s> {
    schema: &'s Schema,
    config: ExecutorConfig,
}

impl<'s> Executor<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            config: ExecutorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn execute_query(&self, query: &str) -> Response {
        self.execute(Request::new(query))
    }

    pub fn execute(&self, request: impl Into<Request>) -> Response {
        let request = request.into();
        tracing::debug!(
            "Executing operation {} ({} bytes)",
            request.operation_name.as_deref().unwrap_or("<anonymous>"),
            request.query.len()
        );

        let document = match parse_query(&request.query) {
            Ok(document) => document,
            Err(e) => return failed(vec![QueryError::syntax(e)]),
        };

        let operation = match select_operation(&document, request.operation_name.as_deref()) {
            Ok(operation) => operation,
            Err(e) => return failed(vec![e]),
        };

        let plan = match validate::plan_operation(
            self.schema,
            &document,
            &operation.node,
            &request.variables,
            &self.config,
        ) {
            Ok(plan) => plan,
            Err(errors) => return failed(errors),
        };

        let root = self.schema.query_type().name();
        let (data, errors) = resolve::execute_plan(self.schema.store(), root, &plan);
        if !errors.is_empty() {
            tracing::warn!("Query resolved with {} field errors", errors.len());
        }

        Response {
            data: Some(data),
            errors,
        }
    }
}

fn failed(errors: Vec<QueryError>) -> Response {
    tracing::warn!(
        "Query rejected: {}",
        errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    );
    Response::from_errors(errors)
}

fn select_operation<'d>(
    document: &'d ExecutableDocument,
    name: Option<&str>,
) -> Result<&'d Positioned<OperationDefinition>, QueryError> {
    let operation = match (&document.operations, name) {
        (DocumentOperations::Single(operation), None) => operation,
        (DocumentOperations::Single(_), Some(name)) => {
            return Err(QueryError::new(
                ErrorKind::Validation,
                format!("Unknown operation named \"{}\".", name),
            ))
        }
        (DocumentOperations::Multiple(operations), Some(name)) => {
            operations.get(name).ok_or_else(|| {
                QueryError::new(
                    ErrorKind::Validation,
                    format!("Unknown operation named \"{}\".", name),
                )
            })?
        }
        (DocumentOperations::Multiple(operations), None) => {
            let mut iter = operations.values();
            match (iter.next(), iter.next()) {
                (Some(operation), None) => operation,
                _ => {
                    return Err(QueryError::new(
                        ErrorKind::Validation,
                        "Operation name required in request.",
                    ))
                }
            }
        }
    };

    match operation.node.ty {
        OperationType::Query => Ok(operation),
        OperationType::Mutation => Err(unsupported("mutations", operation.pos)),
        OperationType::Subscription => Err(unsupported("subscriptions", operation.pos)),
    }
}

fn unsupported(kind: &str, pos: Pos) -> QueryError {
    QueryError::new(
        ErrorKind::Validation,
        format!("Schema is not configured for {}.", kind),
    )
    .at(pos)
}

impl Schema {
    /// Execute a request with default executor limits
    pub fn execute(&self, request: impl Into<Request>) -> Response {
        Executor::new(self).execute(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BlogStore;
    use crate::schema::build_blog_schema;
    use serde_json::json;
    use std::sync::Arc;

    fn schema() -> Schema {
        build_blog_schema(Arc::new(BlogStore::sample())).unwrap()
    }

    #[test]
    fn test_execute_posts() {
        let schema = schema();
        let response = Executor::new(&schema).execute_query("{ posts { id title content } }");

        assert!(response.is_ok());
        assert_eq!(
            response.to_json().unwrap(),
            json!({
                "data": {
                    "posts": [
                        {"id": 1, "title": "Hello World", "content": "My first blog post."},
                        {"id": 2, "title": "My second post", "content": "Welcome in my second post on this blog."}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_syntax_error() {
        let schema = schema();
        let response = schema.execute("{ posts { id ");

        assert!(response.data.is_none());
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].kind, ErrorKind::Syntax);
        assert!(!response.errors[0].locations.is_empty());
    }

    #[test]
    fn test_operation_selection() {
        let schema = schema();
        let query = "query A { posts { id } } query B { authors { id } }";

        let response = schema.execute(Request::new(query).operation_name("B"));
        assert_eq!(response.to_json().unwrap(), json!({ "data": { "authors": [{"id": 1}] } }));

        let response = schema.execute(query);
        assert!(response.data.is_none());
        assert!(response.errors[0].message.contains("Operation name required"));

        let response = schema.execute(Request::new(query).operation_name("C"));
        assert!(response.errors[0].message.contains("Unknown operation named \"C\""));
    }

    #[test]
    fn test_mutation_rejected() {
        let schema = schema();
        let response = schema.execute("mutation { posts { id } }");

        assert!(response.data.is_none());
        assert_eq!(response.errors[0].kind, ErrorKind::Validation);
        assert!(response.errors[0].message.contains("mutations"));
    }

    #[test]
    fn test_max_depth_from_config() {
        let schema = schema();
        let executor = Executor::new(&schema).with_config(ExecutorConfig {
            max_depth: 3,
            ..ExecutorConfig::default()
        });

        let response = executor.execute_query("{ posts { author { id } } }");
        assert!(response.is_ok());

        let response = executor.execute_query("{ posts { author { posts { id } } } }");
        assert!(response.data.is_none());
    }

    #[test]
    fn test_executor_is_stateless() {
        let schema = schema();
        let executor = Executor::new(&schema);

        let bad = executor.execute_query("{ nope }");
        assert!(bad.data.is_none());

        let good = executor.execute_query("{ post(id: 2) { title } }");
        assert!(good.is_ok());
        assert_eq!(
            good.to_json().unwrap(),
            json!({ "data": { "post": { "title": "My second post" } } })
        );
    }
}
