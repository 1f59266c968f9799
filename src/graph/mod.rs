//! Association graph data model
//!
//! - Integer-identified nodes standing for content entities
//! - Undirected connections of a single well-known relationship type
//! - Path results and the graphs assembled from them
//! - Mutation events used for cache invalidation

pub mod event;
pub mod path;
pub mod types;

pub use event::{GraphEvent, GraphEventBus, GraphEventHandler};
pub use path::{Connection, Paging, PathGraph, PathResult};
pub use types::{DeleteMode, EdgeRef, EdgeType, IndexFor, NodeId, NodeRef};
