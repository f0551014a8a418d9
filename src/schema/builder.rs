/// GraphQL schema builder
///
/// This module provides the `SchemaBuilder`, which checks a registry of object
/// types and binds it to a data store, and `build_blog_schema`, which wires the
/// blog's Author/Post types and root query fields.

use crate::data::BlogStore;
use crate::error::{BlogqlError, Result};
use crate::schema::registry::TypeRegistry;
use crate::schema::resolver::Resolver;
use crate::schema::types::{FieldDescriptor, ObjectType, RegisteredType, ScalarType, TypeRef};

use std::fmt::Write;
use std::sync::Arc;

/// Name of the blog's root query type
pub const QUERY_TYPE: &str = "RootQuery";

/// A checked, read-only schema bound to its data store
#[derive(Debug, Clone)]
pub struct Schema {
    registry: TypeRegistry,
    query_type: String,
    store: Arc<BlogStore>,
}

impl Schema {
    pub fn build(query_type: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(query_type)
    }

    pub fn query_type(&self) -> &RegisteredType {
        self.registry
            .get(&self.query_type)
            .expect("query type is checked when the schema is built")
    }

    pub fn object_type(&self, name: &str) -> Option<&RegisteredType> {
        self.registry.get(name)
    }

    pub fn is_object_type(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn store(&self) -> &BlogStore {
        &self.store
    }

    /// Render the schema as GraphQL SDL
    pub fn sdl(&self) -> String {
        let mut sdl = String::new();
        let _ = writeln!(sdl, "schema {{\n  query: {}\n}}", self.query_type);

        for object in self.registry.types() {
            sdl.push('\n');
            if let Some(desc) = &object.description {
                let _ = writeln!(sdl, "{}", quote(desc));
            }
            let _ = writeln!(sdl, "type {} {{", object.name);

            for field in object.fields() {
                if let Some(desc) = &field.description {
                    let _ = writeln!(sdl, "  {}", quote(desc));
                }
                let _ = write!(sdl, "  {}", field.name);
                if !field.arguments.is_empty() {
                    let args: Vec<String> = field
                        .arguments
                        .iter()
                        .map(|(name, ty)| format!("{}: {}", name, ty))
                        .collect();
                    let _ = write!(sdl, "({})", args.join(", "));
                }
                let _ = writeln!(sdl, ": {}", field.ty);
            }

            sdl.push_str("}\n");
        }

        sdl
    }
}

fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Schema builder
pub struct SchemaBuilder {
    query_type: String,
    registry: TypeRegistry,
    errors: Vec<BlogqlError>,
}

impl SchemaBuilder {
    pub fn new(query_type: impl Into<String>) -> Self {
        Self {
            query_type: query_type.into(),
            registry: TypeRegistry::new(),
            errors: Vec::new(),
        }
    }

    /// Register an object type; failures are reported by `finish`
    pub fn register(mut self, object: ObjectType) -> Self {
        if let Err(e) = self.registry.define_type(object) {
            self.errors.push(e);
        }
        self
    }

    /// Check the type graph and bind it to the store
    pub fn finish(mut self, store: Arc<BlogStore>) -> Result<Schema> {
        if !self.errors.is_empty() {
            return Err(self.errors.remove(0));
        }

        if !self.registry.contains(&self.query_type) {
            return Err(BlogqlError::SchemaGeneration(format!(
                "Query type '{}' is not registered",
                self.query_type
            )));
        }

        for object in self.registry.types() {
            for field in object.fields() {
                check_field(&self.registry, object, field)?;
            }
        }

        tracing::info!(
            "Schema built with {} object types, query root {}",
            self.registry.len(),
            self.query_type
        );

        Ok(Schema {
            registry: self.registry,
            query_type: self.query_type,
            store,
        })
    }
}

fn check_field(
    registry: &TypeRegistry,
    object: &RegisteredType,
    field: &FieldDescriptor,
) -> Result<()> {
    let referenced = field.ty.base_name();
    if ScalarType::from_name(referenced).is_none() && !registry.contains(referenced) {
        return Err(BlogqlError::UnresolvedType {
            type_name: object.name.clone(),
            field: field.name.clone(),
            referenced: referenced.to_string(),
        });
    }

    for (argument, ty) in field.resolver.required_arguments() {
        if field.arguments.get(*argument) != Some(ty) {
            return Err(BlogqlError::InvalidArgument {
                type_name: object.name.clone(),
                field: field.name.clone(),
                argument: argument.to_string(),
                reason: format!("resolver {:?} requires `{}: {}`", field.resolver, argument, ty),
            });
        }
    }

    Ok(())
}

/// Build the blog schema over `store`
pub fn build_blog_schema(store: Arc<BlogStore>) -> Result<Schema> {
    let author = ObjectType::new("Author")
        .description("A person who writes posts")
        .field(FieldDescriptor::new(
            "id",
            TypeRef::scalar(ScalarType::Int),
            Resolver::attribute("id"),
        ))
        .field(FieldDescriptor::new(
            "firstName",
            TypeRef::scalar(ScalarType::String),
            Resolver::attribute("firstName"),
        ))
        .field(FieldDescriptor::new(
            "lastName",
            TypeRef::scalar(ScalarType::String),
            Resolver::attribute("lastName"),
        ))
        .field(
            FieldDescriptor::new("posts", TypeRef::list(TypeRef::named("Post")), Resolver::AuthorPosts)
                .description("Posts written by this author"),
        );

    let post = ObjectType::new("Post")
        .description("A blog post")
        .field(FieldDescriptor::new(
            "id",
            TypeRef::scalar(ScalarType::Int),
            Resolver::attribute("id"),
        ))
        .field(FieldDescriptor::new(
            "title",
            TypeRef::scalar(ScalarType::String),
            Resolver::attribute("title"),
        ))
        .field(FieldDescriptor::new(
            "author",
            TypeRef::named("Author"),
            Resolver::PostAuthor,
        ))
        .field(FieldDescriptor::new(
            "content",
            TypeRef::scalar(ScalarType::String),
            Resolver::attribute("content"),
        ));

    let query = ObjectType::new(QUERY_TYPE)
        .field(
            FieldDescriptor::new("post", TypeRef::named("Post"), Resolver::PostById)
                .description("Get post by ID")
                .argument("id", ScalarType::Int),
        )
        .field(
            FieldDescriptor::new("posts", TypeRef::list(TypeRef::named("Post")), Resolver::AllPosts)
                .description("Get all posts"),
        )
        .field(
            FieldDescriptor::new("author", TypeRef::named("Author"), Resolver::AuthorById)
                .description("Get author by ID")
                .argument("id", ScalarType::Int),
        )
        .field(
            FieldDescriptor::new(
                "authors",
                TypeRef::list(TypeRef::named("Author")),
                Resolver::AllAuthors,
            )
            .description("Get all authors"),
        );

    Schema::build(QUERY_TYPE)
        .register(author)
        .register(post)
        .register(query)
        .finish(store)
}
