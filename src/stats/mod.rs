//! Graph statistics
//!
//! Two records are kept per graph:
//!
//! - **`GraphInfo`**: the biggest node and its neighbour count, stored in a
//!   repository and looked up by graph name
//! - **`GraphStatistics`**: node count, connection count and central node,
//!   an aggregate owned by the host application

pub mod info;
pub mod statistics;

pub use info::{GraphInfo, GraphInfoRecord, GraphInfoRepository, GraphInfoService, MemoryGraphInfoRepository};
pub use statistics::{GraphStatistics, GraphStatisticsSnapshot, MemoryGraphStatistics};

use thiserror::Error;

/// Statistics store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("Graph info record {0} not found")]
    RecordNotFound(u64),

    #[error("A graph info record for the graph {0} already exists")]
    DuplicateGraphName(String),

    /// Failure inside an external repository
    #[error("Repository error: {0}")]
    Repository(String),
}

pub type StatsResult<T> = Result<T, StatsError>;
