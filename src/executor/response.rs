use async_graphql::parser::Pos;
use async_graphql::Value;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Which pipeline stage produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Validation,
    Resolution,
}

impl ErrorKind {
    pub const fn code(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "GRAPHQL_PARSE_FAILED",
            ErrorKind::Validation => "GRAPHQL_VALIDATION_FAILED",
            ErrorKind::Resolution => "RESOLVER_FAILED",
        }
    }
}

/// One step of a response path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Field(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Source location in the query text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<Pos> for Location {
    fn from(pos: Pos) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

/// A field-path-tagged query error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryError {
    pub message: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,

    #[serde(rename = "extensions", serialize_with = "serialize_kind")]
    pub kind: ErrorKind,
}

fn serialize_kind<S: Serializer>(kind: &ErrorKind, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry("code", kind.code())?;
    map.end()
}

impl QueryError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
            kind,
        }
    }

    pub fn syntax(err: async_graphql::parser::Error) -> Self {
        Self {
            message: err.to_string(),
            locations: err.positions().map(Location::from).collect(),
            path: Vec::new(),
            kind: ErrorKind::Syntax,
        }
    }

    pub fn validation(message: impl Into<String>, pos: Pos, path: &[PathSegment]) -> Self {
        Self::new(ErrorKind::Validation, message)
            .at(pos)
            .with_path(path)
    }

    pub fn resolution(message: impl Into<String>, pos: Pos, path: &[PathSegment]) -> Self {
        Self::new(ErrorKind::Resolution, message)
            .at(pos)
            .with_path(path)
    }

    pub fn at(mut self, pos: Pos) -> Self {
        self.locations.push(pos.into());
        self
    }

    pub fn with_path(mut self, path: &[PathSegment]) -> Self {
        self.path = path.to_vec();
        self
    }
}

/// Result of executing one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Resolved tree; `None` when parsing or validation failed
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<QueryError>,
}

impl Response {
    pub fn from_errors(errors: Vec<QueryError>) -> Self {
        Self { data: None, errors }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    pub fn to_json_string(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
