/// GraphQL schema definition
///
/// This module provides the type registry, the resolver strategies and the
/// schema builder that binds them to a `BlogStore`.

mod builder;
pub mod registry;
pub mod resolver;
pub mod types;

pub use builder::{build_blog_schema, Schema, SchemaBuilder, QUERY_TYPE};
pub use registry::TypeRegistry;
pub use resolver::{ArgumentValue, Arguments, ResolveError, Resolved, Resolver};
pub use types::{FieldDescriptor, ObjectType, RegisteredType, ScalarType, TypeRef};
