/// In-memory blog data
///
/// `BlogStore` is the read-only context object every resolver reads from. It is
/// built once, explicitly, and handed to schema construction.

use crate::config::Config;
use crate::error::{BlogqlError, Result};

use async_graphql::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author_id: i32,
}

/// Immutable store of authors and posts, keyed by id
#[derive(Debug, Clone, Default)]
pub struct BlogStore {
    authors: BTreeMap<i32, Author>,
    posts: BTreeMap<i32, Post>,
}

impl BlogStore {
    /// Build a store, rejecting duplicate ids and posts without an author
    pub fn new(authors: Vec<Author>, posts: Vec<Post>) -> Result<Self> {
        let mut store = Self::default();

        for author in authors {
            if store.authors.contains_key(&author.id) {
                return Err(BlogqlError::Config(format!(
                    "Author id {} is declared more than once",
                    author.id
                )));
            }
            store.authors.insert(author.id, author);
        }

        for post in posts {
            if store.posts.contains_key(&post.id) {
                return Err(BlogqlError::Config(format!(
                    "Post id {} is declared more than once",
                    post.id
                )));
            }
            if !store.authors.contains_key(&post.author_id) {
                return Err(BlogqlError::Config(format!(
                    "Post {} references unknown author {}",
                    post.id, post.author_id
                )));
            }
            store.posts.insert(post.id, post);
        }

        Ok(store)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let authors = config
            .author
            .iter()
            .map(|a| Author {
                id: a.id,
                first_name: a.first_name.clone(),
                last_name: a.last_name.clone(),
            })
            .collect();

        let posts = config
            .post
            .iter()
            .map(|p| Post {
                id: p.id,
                title: p.title.clone(),
                content: p.content.clone(),
                author_id: p.author_id,
            })
            .collect();

        let store = Self::new(authors, posts)?;
        tracing::debug!(
            "Loaded {} authors and {} posts",
            store.authors.len(),
            store.posts.len()
        );
        Ok(store)
    }

    /// The sample blog from `Config::example()`
    pub fn sample() -> Self {
        match Self::from_config(&Config::example()) {
            Ok(store) => store,
            Err(e) => {
                tracing::error!("Sample blog failed its integrity checks: {}", e);
                Self::default()
            }
        }
    }

    pub fn post(&self, id: i32) -> Option<&Post> {
        self.posts.get(&id)
    }

    pub fn author(&self, id: i32) -> Option<&Author> {
        self.authors.get(&id)
    }

    /// All posts in ascending id order
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.values()
    }

    /// All authors in ascending id order
    pub fn authors(&self) -> impl Iterator<Item = &Author> {
        self.authors.values()
    }

    pub fn posts_by_author(&self, author_id: i32) -> impl Iterator<Item = &Post> {
        self.posts.values().filter(move |p| p.author_id == author_id)
    }
}

/// A borrowed source object handed to resolvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity<'a> {
    Root,
    Author(&'a Author),
    Post(&'a Post),
}

impl<'a> Entity<'a> {
    /// GraphQL object type this entity satisfies; `None` for the query root
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Entity::Root => None,
            Entity::Author(_) => Some("Author"),
            Entity::Post(_) => Some("Post"),
        }
    }

    /// Scalar attribute by GraphQL field name
    pub fn attribute(&self, name: &str) -> Option<Value> {
        match (self, name) {
            (Entity::Author(a), "id") => Some(Value::Number(a.id.into())),
            (Entity::Author(a), "firstName") => Some(Value::String(a.first_name.clone())),
            (Entity::Author(a), "lastName") => Some(Value::String(a.last_name.clone())),
            (Entity::Post(p), "id") => Some(Value::Number(p.id.into())),
            (Entity::Post(p), "title") => Some(Value::String(p.title.clone())),
            (Entity::Post(p), "content") => Some(Value::String(p.content.clone())),
            _ => None,
        }
    }
}
