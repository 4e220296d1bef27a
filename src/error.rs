//! Error types for the navigation tree engine.

use crate::types::NodeId;
use thiserror::Error;

/// Failures of the offline snapshot store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Snapshot database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Snapshot codec error for key {key}: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by tree operations and their collaborators.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Not a fetchable page id: {0:?}")]
    InvalidNode(NodeId),

    #[error("Failed to fetch children of {parent}: {message}")]
    FetchChildrenFailed { parent: NodeId, message: String },

    #[error("Failed to fetch node {node}: {message}")]
    FetchNodeFailed { node: NodeId, message: String },

    #[error("Failed to persist order for {scope}: {message}")]
    PersistFailed { scope: String, message: String },

    #[error("Invalid drag: {0}")]
    InvalidDrag(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Page service request failed: {0}")]
    RequestFailed(String),

    #[error(transparent)]
    StorageError(#[from] StorageError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::RequestFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_lift_into_api_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: ApiError = StorageError::from(io).into();
        assert!(matches!(err, ApiError::StorageError(StorageError::IoError(_))));
        assert_eq!(err.to_string(), "I/O error: disk gone");
    }

    #[test]
    fn fetch_failure_names_the_parent() {
        let err = ApiError::FetchChildrenFailed {
            parent: NodeId::new("p1"),
            message: "timeout".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to fetch children of p1: timeout");
    }
}
