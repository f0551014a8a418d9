/// Resolver strategies
///
/// Every field names one strategy from this module. A strategy takes an explicit
/// source entity and bound arguments and returns a resolved value or a
/// `ResolveError`, so it can be exercised without building a schema.

use crate::data::{BlogStore, Entity};
use crate::schema::types::ScalarType;

use async_graphql::Value;
use indexmap::IndexMap;
use thiserror::Error;

/// Named resolver strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolver {
    /// Scalar attribute of the source entity, by field name
    Attribute(String),
    /// Post -> Author
    PostAuthor,
    /// Author -> posts written by the author
    AuthorPosts,
    /// Root lookup of a post by `id`
    PostById,
    /// Root lookup of an author by `id`
    AuthorById,
    AllPosts,
    AllAuthors,
}

/// A coerced argument value
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Null,
    Int(i32),
    Float(f64),
    String(String),
    Boolean(bool),
    Id(String),
}

/// Arguments bound to a strategy during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arguments {
    None,
    Lookup { id: Option<i32> },
}

/// Outcome of a successful resolver call
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// No value; not an error
    Null,
    Scalar(Value),
    Entity(Entity<'a>),
    List(Vec<Resolved<'a>>),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ResolveError {
    pub message: String,
}

impl ResolveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ResolveResult<'a> = std::result::Result<Resolved<'a>, ResolveError>;

impl Resolver {
    pub fn attribute(name: impl Into<String>) -> Self {
        Resolver::Attribute(name.into())
    }

    /// Arguments the strategy reads, which the field must declare
    pub fn required_arguments(&self) -> &'static [(&'static str, ScalarType)] {
        match self {
            Resolver::PostById | Resolver::AuthorById => &[("id", ScalarType::Int)],
            _ => &[],
        }
    }

    /// Bind coerced arguments into the strategy's typed argument shape
    pub fn bind_arguments(
        &self,
        args: &IndexMap<String, ArgumentValue>,
    ) -> std::result::Result<Arguments, String> {
        match self {
            Resolver::PostById | Resolver::AuthorById => match args.get("id") {
                None | Some(ArgumentValue::Null) => Ok(Arguments::Lookup { id: None }),
                Some(ArgumentValue::Int(id)) => Ok(Arguments::Lookup { id: Some(*id) }),
                Some(other) => Err(format!("expected Int for argument \"id\", found {:?}", other)),
            },
            _ => Ok(Arguments::None),
        }
    }

    pub fn resolve<'a>(
        &self,
        store: &'a BlogStore,
        source: Entity<'a>,
        args: &Arguments,
    ) -> ResolveResult<'a> {
        match self {
            Resolver::Attribute(name) => source
                .attribute(name)
                .map(Resolved::Scalar)
                .ok_or_else(|| {
                    ResolveError::new(format!(
                        "{} has no attribute \"{}\"",
                        describe(source),
                        name
                    ))
                }),

            Resolver::PostAuthor => match source {
                Entity::Post(post) => store
                    .author(post.author_id)
                    .map(|author| Resolved::Entity(Entity::Author(author)))
                    .ok_or_else(|| {
                        ResolveError::new(format!(
                            "Author {} of post {} not found",
                            post.author_id, post.id
                        ))
                    }),
                other => Err(unexpected_source("Post", other)),
            },

            Resolver::AuthorPosts => match source {
                Entity::Author(author) => Ok(Resolved::List(
                    store
                        .posts_by_author(author.id)
                        .map(|post| Resolved::Entity(Entity::Post(post)))
                        .collect(),
                )),
                other => Err(unexpected_source("Author", other)),
            },

            Resolver::PostById => match args {
                Arguments::Lookup { id: Some(id) } => Ok(store
                    .post(*id)
                    .map_or(Resolved::Null, |post| Resolved::Entity(Entity::Post(post)))),
                Arguments::Lookup { id: None } => Ok(Resolved::Null),
                Arguments::None => Err(ResolveError::new("post lookup requires an id argument")),
            },

            Resolver::AuthorById => match args {
                Arguments::Lookup { id: Some(id) } => Ok(store
                    .author(*id)
                    .map_or(Resolved::Null, |author| Resolved::Entity(Entity::Author(author)))),
                Arguments::Lookup { id: None } => Ok(Resolved::Null),
                Arguments::None => Err(ResolveError::new("author lookup requires an id argument")),
            },

            Resolver::AllPosts => Ok(Resolved::List(
                store
                    .posts()
                    .map(|post| Resolved::Entity(Entity::Post(post)))
                    .collect(),
            )),

            Resolver::AllAuthors => Ok(Resolved::List(
                store
                    .authors()
                    .map(|author| Resolved::Entity(Entity::Author(author)))
                    .collect(),
            )),
        }
    }
}

fn describe(source: Entity<'_>) -> &'static str {
    source.type_name().unwrap_or("The query root")
}

fn unexpected_source(expected: &str, found: Entity<'_>) -> ResolveError {
    ResolveError::new(format!(
        "expected a {} source, found {}",
        expected,
        found.type_name().unwrap_or("the query root")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(resolved: &Resolved<'_>) -> Vec<i32> {
        match resolved {
            Resolved::List(items) => items
                .iter()
                .map(|item| match item {
                    Resolved::Entity(Entity::Post(p)) => p.id,
                    Resolved::Entity(Entity::Author(a)) => a.id,
                    other => panic!("unexpected item {:?}", other),
                })
                .collect(),
            other => panic!("expected a list, got {:?}", other),
        }
    }

    #[test]
    fn test_post_by_id() {
        let store = BlogStore::sample();
        let args = Arguments::Lookup { id: Some(1) };

        let resolved = Resolver::PostById.resolve(&store, Entity::Root, &args).unwrap();
        assert_eq!(resolved, Resolved::Entity(Entity::Post(store.post(1).unwrap())));
    }

    #[test]
    fn test_missing_post_is_null_not_error() {
        let store = BlogStore::sample();

        let missing = Arguments::Lookup { id: Some(999) };
        assert_eq!(
            Resolver::PostById.resolve(&store, Entity::Root, &missing),
            Ok(Resolved::Null)
        );

        let absent = Arguments::Lookup { id: None };
        assert_eq!(
            Resolver::PostById.resolve(&store, Entity::Root, &absent),
            Ok(Resolved::Null)
        );
    }

    #[test]
    fn test_all_posts_and_authors() {
        let store = BlogStore::sample();

        let posts = Resolver::AllPosts.resolve(&store, Entity::Root, &Arguments::None).unwrap();
        assert_eq!(ids(&posts), vec![1, 2]);

        let authors = Resolver::AllAuthors.resolve(&store, Entity::Root, &Arguments::None).unwrap();
        assert_eq!(ids(&authors), vec![1]);
    }

    #[test]
    fn test_post_author_relation() {
        let store = BlogStore::sample();
        let post = Entity::Post(store.post(2).unwrap());

        let resolved = Resolver::PostAuthor.resolve(&store, post, &Arguments::None).unwrap();
        assert_eq!(resolved, Resolved::Entity(Entity::Author(store.author(1).unwrap())));
    }

    #[test]
    fn test_author_posts_relation() {
        let store = BlogStore::sample();
        let author = Entity::Author(store.author(1).unwrap());

        let resolved = Resolver::AuthorPosts.resolve(&store, author, &Arguments::None).unwrap();
        assert_eq!(ids(&resolved), vec![1, 2]);
    }

    #[test]
    fn test_wrong_source_is_an_error() {
        let store = BlogStore::sample();

        let err = Resolver::PostAuthor
            .resolve(&store, Entity::Root, &Arguments::None)
            .unwrap_err();
        assert!(err.message.contains("expected a Post source"));

        let author = Entity::Author(store.author(1).unwrap());
        let err = Resolver::attribute("title")
            .resolve(&store, author, &Arguments::None)
            .unwrap_err();
        assert_eq!(err.to_string(), "Author has no attribute \"title\"");
    }

    #[test]
    fn test_attribute() {
        let store = BlogStore::sample();
        let author = Entity::Author(store.author(1).unwrap());

        let resolved = Resolver::attribute("lastName")
            .resolve(&store, author, &Arguments::None)
            .unwrap();
        assert_eq!(resolved, Resolved::Scalar(Value::String("Rosik".to_string())));
    }

    #[test]
    fn test_bind_lookup_arguments() {
        let mut args = IndexMap::new();
        assert_eq!(
            Resolver::PostById.bind_arguments(&args),
            Ok(Arguments::Lookup { id: None })
        );

        args.insert("id".to_string(), ArgumentValue::Int(2));
        assert_eq!(
            Resolver::AuthorById.bind_arguments(&args),
            Ok(Arguments::Lookup { id: Some(2) })
        );

        args.insert("id".to_string(), ArgumentValue::String("2".to_string()));
        assert!(Resolver::PostById.bind_arguments(&args).is_err());

        assert_eq!(Resolver::AllPosts.bind_arguments(&args), Ok(Arguments::None));
    }
}
