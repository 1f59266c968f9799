//! Graph store clients
//!
//! `GraphClient` is the narrow surface the connection manager and the path
//! finder need from a graph database:
//!
//! - node/relationship creation and deletion
//! - exact-match node indexes keyed by the content id
//! - degree, neighbour and connection listings
//! - bounded-depth path and neighbourhood queries
//!
//! Two implementations are provided:
//!
//! - **`MemoryGraphClient`**: in-process store, no network. Used by tests,
//!   the demo binary and embedded callers.
//! - **`HttpGraphClient`**: talks to a Neo4j-compatible transactional Cypher
//!   endpoint over HTTP.
//!
//! `GraphClientPool` hands out one shared client per endpoint address.

pub mod error;
pub mod http;
pub mod memory;
pub mod pool;

pub use error::{ClientError, ClientResult};
pub use http::HttpGraphClient;
pub use memory::{MemoryGraphClient, MemoryStore, MemoryStoreError};
pub use pool::{ClientConnector, GraphClientPool, HttpConnector, SharedClientConnector};

use crate::graph::{Connection, DeleteMode, EdgeRef, EdgeType, IndexFor, NodeId, NodeRef, Paging};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A node as returned by an index lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexedNode {
    pub reference: NodeRef,
    pub id: NodeId,
}

/// A node together with its number of association edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDegree {
    pub id: NodeId,
    pub degree: u64,
}

/// One node of a raw path; only the content id is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathNode {
    pub id: NodeId,
}

/// A path exactly as the store returns it, start node first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawPath {
    pub nodes: Vec<PathNode>,
}

impl RawPath {
    pub fn from_ids(ids: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            nodes: ids.into_iter().map(|id| PathNode { id }).collect(),
        }
    }

    pub fn into_node_ids(self) -> Vec<NodeId> {
        self.nodes.into_iter().map(|node| node.id).collect()
    }

    /// Number of edges in the path
    pub fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// All simple paths between two nodes, `min_depth..=max_depth` edges long,
/// following edges of `edge_type` in either direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    pub start: NodeRef,
    pub target: NodeRef,
    pub edge_type: EdgeType,
    pub min_depth: usize,
    pub max_depth: usize,
}

impl PathQuery {
    pub fn new(start: NodeRef, target: NodeRef, max_depth: usize) -> Self {
        Self {
            start,
            target,
            edge_type: EdgeType::association(),
            min_depth: 1,
            max_depth,
        }
    }
}

/// Client interface of the external graph store
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Check the store is reachable
    async fn ping(&self) -> ClientResult<()>;

    /// Create a node carrying `id` and add it to the exact-match index `index`
    async fn create_indexed_node(&self, index: &str, id: NodeId) -> ClientResult<NodeRef>;

    async fn delete_node(&self, node: NodeRef, mode: DeleteMode) -> ClientResult<()>;

    async fn create_edge(&self, from: NodeRef, to: NodeRef, edge_type: &EdgeType) -> ClientResult<EdgeRef>;

    async fn delete_edge(&self, edge: EdgeRef) -> ClientResult<()>;

    async fn create_exact_match_index(&self, name: &str, kind: IndexFor) -> ClientResult<()>;

    async fn index_exists(&self, name: &str, kind: IndexFor) -> ClientResult<bool>;

    /// Exact-match lookup; `query` has the form `id:<value>`
    async fn query_index(&self, name: &str, kind: IndexFor, query: &str) -> ClientResult<Vec<IndexedNode>>;

    /// Edge of `edge_type` between `node` and the node carrying `other`, in either direction
    async fn edge_between(&self, node: NodeRef, other: NodeId, edge_type: &EdgeType) -> ClientResult<Option<EdgeRef>>;

    async fn count_edges(&self, node: NodeRef, edge_type: &EdgeType) -> ClientResult<u64>;

    async fn neighbour_ids(&self, node: NodeRef, edge_type: &EdgeType, paging: Paging) -> ClientResult<Vec<NodeId>>;

    /// Every edge of `edge_type`, once, in store order
    async fn connections(&self, edge_type: &EdgeType, paging: Paging) -> ClientResult<Vec<Connection>>;

    async fn node_count(&self) -> ClientResult<u64>;

    async fn connection_count(&self, edge_type: &EdgeType) -> ClientResult<u64>;

    /// Node with the most edges of `edge_type`; equal degrees resolve to the lowest id
    async fn biggest_node(&self, edge_type: &EdgeType) -> ClientResult<Option<NodeDegree>>;

    async fn bounded_paths(&self, query: &PathQuery) -> ClientResult<Vec<RawPath>>;

    /// Edges lying on some path of at most `max_depth` edges starting at `center`
    async fn neighbourhood(
        &self,
        center: NodeRef,
        edge_type: &EdgeType,
        max_depth: usize,
        paging: Paging,
    ) -> ClientResult<Vec<Connection>>;

    /// Store-owned nodes (e.g. a reference/root node) included in `node_count`
    fn reserved_node_count(&self) -> u64 {
        0
    }
}

/// Parse an exact-match index query of the form `id:<value>`
pub(crate) fn parse_id_query(query: &str) -> Option<NodeId> {
    let (key, value) = query.split_once(':')?;
    if key.trim() != "id" {
        return None;
    }
    value.trim().parse::<u64>().ok().map(NodeId)
}
