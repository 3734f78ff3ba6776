use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

/// Why an operation's metadata could not be turned into a render context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("operation path {0:?} is not an absolute path template")]
    InvalidPath(String),

    #[error("unresolved reference: {0}")]
    UnresolvedRef(String),

    #[error("path placeholder {{{placeholder}}} in {path} has no matching path parameter")]
    UndeclaredPathParam { path: String, placeholder: String },
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template error: {0}")]
    Template(String),
}

impl GeneratorError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneratorError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
