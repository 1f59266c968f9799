//! Crate-level errors

use crate::client::ClientError;
use crate::config::ConfigError;
use crate::stats::StatsError;
use thiserror::Error;

/// Errors returned by the connection manager and the path finder
#[derive(Error, Debug)]
pub enum AssocError {
    /// Missing or invalid settings; raised by the first operation needing them
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The client pool could not hand out a client for the graph's endpoint
    #[error("Acquiring a graph client for the graph {graph} with the url {endpoint} failed")]
    Connectivity {
        graph: String,
        endpoint: String,
        #[source]
        source: ClientError,
    },

    /// Store-level failure, passed through untranslated
    #[error(transparent)]
    Store(#[from] ClientError),

    /// Graph info repository or statistics aggregate failure
    #[error(transparent)]
    Statistics(#[from] StatsError),
}

pub type AssocResult<T> = Result<T, AssocError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_connectivity_error_carries_context() {
        let err = AssocError::Connectivity {
            graph: "notions".to_string(),
            endpoint: "http://localhost:7474/db/data/".to_string(),
            source: ClientError::Connection("refused".to_string()),
        };

        let message = err.to_string();
        assert!(message.contains("notions"));
        assert!(message.contains("http://localhost:7474/db/data/"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: AssocError = ClientError::Query("syntax".to_string()).into();
        assert_eq!(err.to_string(), "Query error: syntax");
    }
}
