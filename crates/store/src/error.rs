use thiserror::Error;

/// Errors that can occur when accessing a repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No value is stored under the given key.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A value is already stored under the given key.
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// The backing storage rejected the operation.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors that can occur when publishing an event.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The envelope is missing a required field.
    #[error("Event envelope is missing required field: {0}")]
    MissingField(&'static str),

    /// The event payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transport rejected the event.
    #[error("Failed to publish event on topic '{topic}': {reason}")]
    Rejected { topic: String, reason: String },
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
