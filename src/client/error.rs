//! Error types for graph store clients

use super::memory::MemoryStoreError;
use thiserror::Error;

/// Errors raised by a graph store client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Query rejected or failed inside the store
    #[error("Query error: {0}")]
    Query(String),

    /// Store unreachable or unhealthy
    #[error("Connection error: {0}")]
    Connection(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// In-process store error
    #[error("Store error: {0}")]
    Store(#[from] MemoryStoreError),
}

pub type ClientResult<T> = Result<T, ClientError>;
