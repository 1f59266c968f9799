//! Assocgraph
//!
//! An undirected association graph between content entities, persisted in an
//! external graph database.
//!
//! # Components
//!
//! - [`client`]: store client trait, in-process and HTTP implementations,
//!   per-endpoint client pool
//! - [`index`]: exact-match index from node id to store reference
//! - [`manager`]: connect/disconnect nodes, neighbour queries, statistics
//!   upkeep
//! - [`stats`]: biggest-node record and graph statistics
//! - [`pathfinder`]: bounded-depth path discovery and paged partial graphs
//! - [`cache`]: query cache invalidated by graph mutation events
//!
//! ## Example Usage
//!
//! ```rust
//! use assocgraph::{GraphServices, GraphSettings, NodeId, PathFinderSettings};
//!
//! # #[tokio::main]
//! # async fn main() -> assocgraph::AssocResult<()> {
//! let settings = GraphSettings::new("notions", "memory://notions");
//! let (services, _store) = GraphServices::in_memory(&settings);
//!
//! services.manager.connect(NodeId(1), NodeId(2)).await?;
//! services.manager.connect(NodeId(2), NodeId(3)).await?;
//!
//! let result = services
//!     .path_finder
//!     .find_paths(NodeId(1), NodeId(3), PathFinderSettings::default())
//!     .await?;
//! assert_eq!(result.succeeded_paths, vec![vec![NodeId(1), NodeId(2), NodeId(3)]]);
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod index;
pub mod manager;
pub mod pathfinder;
pub mod services;
pub mod session;
pub mod stats;

// Re-export main types for convenience
pub use cache::{CacheKey, QueryCache};

pub use client::{
    ClientError, ClientResult, GraphClient, GraphClientPool, HttpGraphClient, MemoryGraphClient,
};

pub use config::{ConfigError, GraphSettings, PathFinderSettings};

pub use error::{AssocError, AssocResult};

pub use graph::{
    Connection, EdgeType, GraphEvent, GraphEventBus, GraphEventHandler, NodeId, Paging, PathGraph,
    PathResult,
};

pub use manager::ConnectionManager;
pub use pathfinder::{PathFinder, QueryableGraph};
pub use services::GraphServices;

pub use stats::{
    GraphInfo, GraphInfoService, GraphStatistics, GraphStatisticsSnapshot, StatsError,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
