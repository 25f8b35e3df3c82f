use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Cannot find type: {0}")]
    NotFound(String),

    #[error("Duplicate type key: {0}")]
    DuplicateKey(String),

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    #[error("Invalid type graph: {0}")]
    InvalidGraph(String),
}
