use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub author: Vec<AuthorConfig>,

    #[serde(default)]
    pub post: Vec<PostConfig>,
}

/// Query executor limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Maximum nesting depth of a selection set
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum number of selections visited while expanding fragments
    #[serde(default = "default_max_selections")]
    pub max_selections: usize,
}

fn default_max_depth() -> usize {
    12
}

fn default_max_selections() -> usize {
    10_000
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_selections: default_max_selections(),
        }
    }
}

/// Author seed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorConfig {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// Post seed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostConfig {
    pub id: i32,
    pub title: String,
    pub content: String,

    /// Id of the author who wrote the post
    pub author_id: i32,
}

impl Config {
    /// The sample blog: one author with two posts
    pub fn example() -> Self {
        Self {
            executor: ExecutorConfig::default(),
            author: vec![AuthorConfig {
                id: 1,
                first_name: "Łukasz".to_string(),
                last_name: "Rosik".to_string(),
            }],
            post: vec![
                PostConfig {
                    id: 1,
                    title: "Hello World".to_string(),
                    content: "My first blog post.".to_string(),
                    author_id: 1,
                },
                PostConfig {
                    id: 2,
                    title: "My second post".to_string(),
                    content: "Welcome in my second post on this blog.".to_string(),
                    author_id: 1,
                },
            ],
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.executor.max_depth == 0 {
            return Err("executor.max_depth must be at least 1".to_string());
        }
        if self.executor.max_selections == 0 {
            return Err("executor.max_selections must be at least 1".to_string());
        }

        let mut author_ids = HashSet::new();
        for author in &self.author {
            if !author_ids.insert(author.id) {
                return Err(format!("Author id {} is declared more than once", author.id));
            }
            if author.first_name.trim().is_empty() || author.last_name.trim().is_empty() {
                return Err(format!("Author {} must have a first and last name", author.id));
            }
        }

        let mut post_ids = HashSet::new();
        for post in &self.post {
            if !post_ids.insert(post.id) {
                return Err(format!("Post id {} is declared more than once", post.id));
            }
            if post.title.trim().is_empty() {
                return Err(format!("Post {} must have a title", post.id));
            }
            if !author_ids.contains(&post.author_id) {
                return Err(format!(
                    "Post {} references unknown author {}",
                    post.id, post.author_id
                ));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::example()
    }
}
