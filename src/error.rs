use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogqlError {
    #[error("Type '{0}' is already registered")]
    DuplicateType(String),

    #[error("Field '{field}' is declared more than once on type '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    #[error("Field '{type_name}.{field}' references unknown type '{referenced}'")]
    UnresolvedType {
        type_name: String,
        field: String,
        referenced: String,
    },

    #[error("Argument '{argument}' on '{type_name}.{field}' is invalid: {reason}")]
    InvalidArgument {
        type_name: String,
        field: String,
        argument: String,
        reason: String,
    },

    #[error("Schema generation error: {0}")]
    SchemaGeneration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for BlogqlError {
    fn from(err: toml::de::Error) -> Self {
        BlogqlError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for BlogqlError {
    fn from(err: toml::ser::Error) -> Self {
        BlogqlError::Serialization(format!("TOML serialization error: {}", err))
    }
}

impl From<serde_json::Error> for BlogqlError {
    fn from(err: serde_json::Error) -> Self {
        BlogqlError::Serialization(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, BlogqlError>;
