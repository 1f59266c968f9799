//! MemoryGraphClient: in-process graph store
//!
//! Arena storage with reference reuse, per-node adjacency lists and named
//! exact-match indexes. Behaves like the remote store as far as the
//! `GraphClient` contract goes, without any network.

use super::{parse_id_query, ClientResult, GraphClient, IndexedNode, NodeDegree, PathQuery, RawPath};
use crate::graph::{Connection, DeleteMode, EdgeRef, EdgeType, IndexFor, NodeId, NodeRef, Paging};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised by the in-process store
#[derive(Error, Debug, PartialEq)]
pub enum MemoryStoreError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeRef),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeRef),

    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(NodeRef),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(NodeRef),

    #[error("Node {0} still has relationships")]
    NodeHasRelationships(NodeRef),

    #[error("Index {0} does not exist")]
    IndexNotFound(String),

    #[error("Unsupported index query: {0}")]
    InvalidIndexQuery(String),
}

pub type MemoryStoreResult<T> = Result<T, MemoryStoreError>;

#[derive(Debug, Clone)]
struct StoredNode {
    id: NodeId,
    outgoing: Vec<EdgeRef>,
    incoming: Vec<EdgeRef>,
}

#[derive(Debug, Clone)]
struct StoredEdge {
    source: NodeRef,
    target: NodeRef,
    edge_type: EdgeType,
}

fn apply_paging<T>(items: impl Iterator<Item = T>, paging: Paging) -> Vec<T> {
    let window = items.skip(paging.skip);
    match paging.take {
        Some(take) => window.take(take).collect(),
        None => window.collect(),
    }
}

/// In-memory graph storage
///
/// - nodes: NodeRef -> node record (`None` once deleted)
/// - edges: EdgeRef -> edge record (`None` once deleted)
/// - node_indexes: index name -> content id -> node references
#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: Vec<Option<StoredNode>>,
    edges: Vec<Option<StoredEdge>>,

    /// Freed references, reused before the arenas grow
    free_node_refs: Vec<u64>,
    free_edge_refs: Vec<u64>,

    node_indexes: HashMap<String, HashMap<NodeId, Vec<NodeRef>>>,
    relationship_indexes: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, reference: NodeRef) -> MemoryStoreResult<&StoredNode> {
        self.nodes
            .get(reference.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(MemoryStoreError::NodeNotFound(reference))
    }

    fn edge(&self, reference: EdgeRef) -> Option<&StoredEdge> {
        self.edges.get(reference.0 as usize).and_then(Option::as_ref)
    }

    fn node_id(&self, reference: NodeRef) -> MemoryStoreResult<NodeId> {
        self.node(reference).map(|node| node.id)
    }

    pub fn has_node(&self, reference: NodeRef) -> bool {
        self.node(reference).is_ok()
    }

    pub fn create_exact_match_index(&mut self, name: &str, kind: IndexFor) {
        match kind {
            IndexFor::Node => {
                self.node_indexes.entry(name.to_string()).or_default();
            }
            IndexFor::Relationship => {
                self.relationship_indexes.insert(name.to_string());
            }
        }
    }

    pub fn index_exists(&self, name: &str, kind: IndexFor) -> bool {
        match kind {
            IndexFor::Node => self.node_indexes.contains_key(name),
            IndexFor::Relationship => self.relationship_indexes.contains(name),
        }
    }

    pub fn query_index(&self, name: &str, kind: IndexFor, query: &str) -> MemoryStoreResult<Vec<IndexedNode>> {
        let id = parse_id_query(query).ok_or_else(|| MemoryStoreError::InvalidIndexQuery(query.to_string()))?;

        match kind {
            IndexFor::Node => {
                let entries = self
                    .node_indexes
                    .get(name)
                    .ok_or_else(|| MemoryStoreError::IndexNotFound(name.to_string()))?;
                Ok(entries
                    .get(&id)
                    .map(|refs| refs.iter().map(|reference| IndexedNode { reference: *reference, id }).collect())
                    .unwrap_or_default())
            }
            IndexFor::Relationship if self.relationship_indexes.contains(name) => Ok(Vec::new()),
            IndexFor::Relationship => Err(MemoryStoreError::IndexNotFound(name.to_string())),
        }
    }

    /// Create a node carrying `id` and register it in the node index `index`
    pub fn create_indexed_node(&mut self, index: &str, id: NodeId) -> MemoryStoreResult<NodeRef> {
        if !self.node_indexes.contains_key(index) {
            return Err(MemoryStoreError::IndexNotFound(index.to_string()));
        }

        let reference = match self.free_node_refs.pop() {
            Some(free) => NodeRef(free),
            None => {
                self.nodes.push(None);
                NodeRef((self.nodes.len() - 1) as u64)
            }
        };

        self.nodes[reference.0 as usize] = Some(StoredNode {
            id,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });

        if let Some(entries) = self.node_indexes.get_mut(index) {
            entries.entry(id).or_default().push(reference);
        }

        Ok(reference)
    }

    /// Delete a node, optionally together with its relationships
    pub fn delete_node(&mut self, reference: NodeRef, mode: DeleteMode) -> MemoryStoreResult<()> {
        let node = self.node(reference)?;
        let attached: Vec<EdgeRef> = node.outgoing.iter().chain(node.incoming.iter()).copied().collect();

        if mode == DeleteMode::NodeOnly && !attached.is_empty() {
            return Err(MemoryStoreError::NodeHasRelationships(reference));
        }

        for edge in attached {
            // A self-loop is listed twice; the second removal finds nothing
            if self.edge(edge).is_some() {
                self.delete_edge(edge)?;
            }
        }

        let removed = self.nodes[reference.0 as usize]
            .take()
            .ok_or(MemoryStoreError::NodeNotFound(reference))?;

        for entries in self.node_indexes.values_mut() {
            let now_empty = match entries.get_mut(&removed.id) {
                Some(refs) => {
                    refs.retain(|r| *r != reference);
                    refs.is_empty()
                }
                None => false,
            };
            if now_empty {
                entries.remove(&removed.id);
            }
        }

        self.free_node_refs.push(reference.0);
        Ok(())
    }

    /// Create a directed edge between two existing nodes
    pub fn create_edge(&mut self, source: NodeRef, target: NodeRef, edge_type: &EdgeType) -> MemoryStoreResult<EdgeRef> {
        if !self.has_node(source) {
            return Err(MemoryStoreError::InvalidEdgeSource(source));
        }
        if !self.has_node(target) {
            return Err(MemoryStoreError::InvalidEdgeTarget(target));
        }

        let reference = match self.free_edge_refs.pop() {
            Some(free) => EdgeRef(free),
            None => {
                self.edges.push(None);
                EdgeRef((self.edges.len() - 1) as u64)
            }
        };

        self.edges[reference.0 as usize] = Some(StoredEdge {
            source,
            target,
            edge_type: edge_type.clone(),
        });

        if let Some(Some(node)) = self.nodes.get_mut(source.0 as usize) {
            node.outgoing.push(reference);
        }
        if let Some(Some(node)) = self.nodes.get_mut(target.0 as usize) {
            node.incoming.push(reference);
        }

        Ok(reference)
    }

    pub fn delete_edge(&mut self, reference: EdgeRef) -> MemoryStoreResult<()> {
        let edge = self
            .edges
            .get_mut(reference.0 as usize)
            .and_then(Option::take)
            .ok_or(MemoryStoreError::EdgeNotFound(reference))?;

        if let Some(Some(node)) = self.nodes.get_mut(edge.source.0 as usize) {
            node.outgoing.retain(|e| *e != reference);
        }
        if let Some(Some(node)) = self.nodes.get_mut(edge.target.0 as usize) {
            node.incoming.retain(|e| *e != reference);
        }

        self.free_edge_refs.push(reference.0);
        Ok(())
    }

    /// Edges of `edge_type` attached to `reference`, with the opposite endpoint
    fn edges_of(&self, reference: NodeRef, edge_type: &EdgeType) -> MemoryStoreResult<Vec<(EdgeRef, NodeRef)>> {
        let node = self.node(reference)?;

        let outgoing = node.outgoing.iter().filter_map(|e| {
            self.edge(*e)
                .filter(|edge| &edge.edge_type == edge_type)
                .map(|edge| (*e, edge.target))
        });
        let incoming = node.incoming.iter().filter_map(|e| {
            self.edge(*e)
                .filter(|edge| &edge.edge_type == edge_type)
                .map(|edge| (*e, edge.source))
        });

        Ok(outgoing.chain(incoming).collect())
    }

    pub fn edge_between(&self, reference: NodeRef, other: NodeId, edge_type: &EdgeType) -> MemoryStoreResult<Option<EdgeRef>> {
        for (edge, neighbour) in self.edges_of(reference, edge_type)? {
            if self.node_id(neighbour)? == other {
                return Ok(Some(edge));
            }
        }
        Ok(None)
    }

    pub fn degree(&self, reference: NodeRef, edge_type: &EdgeType) -> MemoryStoreResult<u64> {
        Ok(self.edges_of(reference, edge_type)?.len() as u64)
    }

    pub fn neighbour_ids(&self, reference: NodeRef, edge_type: &EdgeType, paging: Paging) -> MemoryStoreResult<Vec<NodeId>> {
        let ids = self
            .edges_of(reference, edge_type)?
            .into_iter()
            .map(|(_, neighbour)| self.node_id(neighbour))
            .collect::<MemoryStoreResult<Vec<_>>>()?;
        Ok(apply_paging(ids.into_iter(), paging))
    }

    pub fn connections(&self, edge_type: &EdgeType, paging: Paging) -> MemoryStoreResult<Vec<Connection>> {
        let all = self
            .edges
            .iter()
            .flatten()
            .filter(|edge| &edge.edge_type == edge_type)
            .map(|edge| -> MemoryStoreResult<Connection> {
                Ok(Connection::new(self.node_id(edge.source)?, self.node_id(edge.target)?))
            })
            .collect::<MemoryStoreResult<Vec<_>>>()?;
        Ok(apply_paging(all.into_iter(), paging))
    }

    pub fn node_count(&self) -> u64 {
        self.nodes.iter().flatten().count() as u64
    }

    pub fn connection_count(&self, edge_type: &EdgeType) -> u64 {
        self.edges
            .iter()
            .flatten()
            .filter(|edge| &edge.edge_type == edge_type)
            .count() as u64
    }

    /// Node with the highest degree; equal degrees go to the lowest content id
    pub fn biggest_node(&self, edge_type: &EdgeType) -> MemoryStoreResult<Option<NodeDegree>> {
        let mut biggest: Option<NodeDegree> = None;

        for (idx, node) in self.nodes.iter().enumerate() {
            let Some(node) = node else { continue };
            let degree = self.degree(NodeRef(idx as u64), edge_type)?;
            if degree == 0 {
                continue;
            }

            let replace = match &biggest {
                None => true,
                Some(current) => degree > current.degree || (degree == current.degree && node.id < current.id),
            };
            if replace {
                biggest = Some(NodeDegree { id: node.id, degree });
            }
        }

        Ok(biggest)
    }

    /// All simple paths described by `query`
    pub fn bounded_paths(&self, query: &PathQuery) -> MemoryStoreResult<Vec<RawPath>> {
        self.node(query.start)?;
        self.node(query.target)?;

        let mut found = Vec::new();
        let mut stack = vec![query.start];
        let mut on_path = HashSet::from([query.start]);
        self.collect_paths(query, &mut stack, &mut on_path, &mut found)?;

        found
            .into_iter()
            .map(|refs| {
                refs.into_iter()
                    .map(|reference| self.node_id(reference))
                    .collect::<MemoryStoreResult<Vec<_>>>()
                    .map(RawPath::from_ids)
            })
            .collect()
    }

    fn collect_paths(
        &self,
        query: &PathQuery,
        stack: &mut Vec<NodeRef>,
        on_path: &mut HashSet<NodeRef>,
        found: &mut Vec<Vec<NodeRef>>,
    ) -> MemoryStoreResult<()> {
        let depth = stack.len() - 1;
        let Some(&current) = stack.last() else { return Ok(()) };

        if current == query.target && depth >= query.min_depth {
            found.push(stack.clone());
            return Ok(());
        }
        if depth >= query.max_depth {
            return Ok(());
        }

        for (_, next) in self.edges_of(current, &query.edge_type)? {
            if !on_path.insert(next) {
                continue;
            }
            stack.push(next);
            self.collect_paths(query, stack, on_path, found)?;
            stack.pop();
            on_path.remove(&next);
        }

        Ok(())
    }

    /// Edges on paths of at most `max_depth` edges from `center`, sorted, then paged
    ///
    /// An edge qualifies exactly when one of its endpoints is closer than
    /// `max_depth` hops to the center.
    pub fn neighbourhood(
        &self,
        center: NodeRef,
        edge_type: &EdgeType,
        max_depth: usize,
        paging: Paging,
    ) -> MemoryStoreResult<Vec<Connection>> {
        self.node(center)?;

        let mut distances: HashMap<NodeRef, usize> = HashMap::from([(center, 0)]);
        let mut queue = VecDeque::from([center]);

        while let Some(current) = queue.pop_front() {
            let distance = distances[&current];
            if distance >= max_depth {
                continue;
            }
            for (_, next) in self.edges_of(current, edge_type)? {
                if !distances.contains_key(&next) {
                    distances.insert(next, distance + 1);
                    queue.push_back(next);
                }
            }
        }

        let mut seen = HashSet::new();
        let mut connections = Vec::new();
        for (node, distance) in &distances {
            if *distance >= max_depth {
                continue;
            }
            for (edge, neighbour) in self.edges_of(*node, edge_type)? {
                if seen.insert(edge) {
                    connections.push(Connection::new(self.node_id(*node)?, self.node_id(neighbour)?));
                }
            }
        }

        connections.sort();
        connections.dedup();
        Ok(apply_paging(connections.into_iter(), paging))
    }

    /// Drop all nodes and edges; declared indexes stay
    pub fn clear(&mut self) {
        let node_indexes = self.node_indexes.keys().map(|name| (name.clone(), HashMap::new())).collect();
        let relationship_indexes = std::mem::take(&mut self.relationship_indexes);
        *self = Self {
            node_indexes,
            relationship_indexes,
            ..Self::default()
        };
    }
}

/// In-process client that wraps a `MemoryStore` directly
///
/// Counts the traversal queries it serves so callers can observe caching.
pub struct MemoryGraphClient {
    store: Arc<RwLock<MemoryStore>>,
    traversal_queries: AtomicU64,
}

impl MemoryGraphClient {
    pub fn new() -> Self {
        Self::with_store(Arc::new(RwLock::new(MemoryStore::new())))
    }

    pub fn with_store(store: Arc<RwLock<MemoryStore>>) -> Self {
        Self {
            store,
            traversal_queries: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &Arc<RwLock<MemoryStore>> {
        &self.store
    }

    pub async fn store_read(&self) -> tokio::sync::RwLockReadGuard<'_, MemoryStore> {
        self.store.read().await
    }

    pub async fn store_write(&self) -> tokio::sync::RwLockWriteGuard<'_, MemoryStore> {
        self.store.write().await
    }

    /// Number of path and neighbourhood queries served so far
    pub fn traversal_query_count(&self) -> u64 {
        self.traversal_queries.load(Ordering::SeqCst)
    }
}

impl Default for MemoryGraphClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphClient for MemoryGraphClient {
    async fn ping(&self) -> ClientResult<()> {
        Ok(())
    }

    async fn create_indexed_node(&self, index: &str, id: NodeId) -> ClientResult<NodeRef> {
        Ok(self.store.write().await.create_indexed_node(index, id)?)
    }

    async fn delete_node(&self, node: NodeRef, mode: DeleteMode) -> ClientResult<()> {
        Ok(self.store.write().await.delete_node(node, mode)?)
    }

    async fn create_edge(&self, from: NodeRef, to: NodeRef, edge_type: &EdgeType) -> ClientResult<EdgeRef> {
        Ok(self.store.write().await.create_edge(from, to, edge_type)?)
    }

    async fn delete_edge(&self, edge: EdgeRef) -> ClientResult<()> {
        Ok(self.store.write().await.delete_edge(edge)?)
    }

    async fn create_exact_match_index(&self, name: &str, kind: IndexFor) -> ClientResult<()> {
        self.store.write().await.create_exact_match_index(name, kind);
        Ok(())
    }

    async fn index_exists(&self, name: &str, kind: IndexFor) -> ClientResult<bool> {
        Ok(self.store.read().await.index_exists(name, kind))
    }

    async fn query_index(&self, name: &str, kind: IndexFor, query: &str) -> ClientResult<Vec<IndexedNode>> {
        Ok(self.store.read().await.query_index(name, kind, query)?)
    }

    async fn edge_between(&self, node: NodeRef, other: NodeId, edge_type: &EdgeType) -> ClientResult<Option<EdgeRef>> {
        Ok(self.store.read().await.edge_between(node, other, edge_type)?)
    }

    async fn count_edges(&self, node: NodeRef, edge_type: &EdgeType) -> ClientResult<u64> {
        Ok(self.store.read().await.degree(node, edge_type)?)
    }

    async fn neighbour_ids(&self, node: NodeRef, edge_type: &EdgeType, paging: Paging) -> ClientResult<Vec<NodeId>> {
        Ok(self.store.read().await.neighbour_ids(node, edge_type, paging)?)
    }

    async fn connections(&self, edge_type: &EdgeType, paging: Paging) -> ClientResult<Vec<Connection>> {
        Ok(self.store.read().await.connections(edge_type, paging)?)
    }

    async fn node_count(&self) -> ClientResult<u64> {
        Ok(self.store.read().await.node_count())
    }

    async fn connection_count(&self, edge_type: &EdgeType) -> ClientResult<u64> {
        Ok(self.store.read().await.connection_count(edge_type))
    }

    async fn biggest_node(&self, edge_type: &EdgeType) -> ClientResult<Option<NodeDegree>> {
        Ok(self.store.read().await.biggest_node(edge_type)?)
    }

    async fn bounded_paths(&self, query: &PathQuery) -> ClientResult<Vec<RawPath>> {
        self.traversal_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.store.read().await.bounded_paths(query)?)
    }

    async fn neighbourhood(
        &self,
        center: NodeRef,
        edge_type: &EdgeType,
        max_depth: usize,
        paging: Paging,
    ) -> ClientResult<Vec<Connection>> {
        self.traversal_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.store.read().await.neighbourhood(center, edge_type, max_depth, paging)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = "NodeIds";

    fn store_with_chain(ids: &[u64]) -> (MemoryStore, Vec<NodeRef>) {
        let mut store = MemoryStore::new();
        store.create_exact_match_index(INDEX, IndexFor::Node);
        let refs: Vec<NodeRef> = ids
            .iter()
            .map(|id| store.create_indexed_node(INDEX, NodeId(*id)).unwrap())
            .collect();
        for pair in refs.windows(2) {
            store.create_edge(pair[0], pair[1], &EdgeType::association()).unwrap();
        }
        (store, refs)
    }

    #[test]
    fn test_create_node_requires_index() {
        let mut store = MemoryStore::new();
        let err = store.create_indexed_node("missing", NodeId(1)).unwrap_err();
        assert_eq!(err, MemoryStoreError::IndexNotFound("missing".to_string()));
    }

    #[test]
    fn test_index_lookup() {
        let (store, refs) = store_with_chain(&[10, 20]);
        let found = store.query_index(INDEX, IndexFor::Node, "id:20").unwrap();
        assert_eq!(found, vec![IndexedNode { reference: refs[1], id: NodeId(20) }]);
        assert!(store.query_index(INDEX, IndexFor::Node, "id:30").unwrap().is_empty());
        assert!(matches!(
            store.query_index(INDEX, IndexFor::Node, "bogus"),
            Err(MemoryStoreError::InvalidIndexQuery(_))
        ));
    }

    #[test]
    fn test_edge_lookup_is_direction_agnostic() {
        let (store, refs) = store_with_chain(&[1, 2]);
        let t = EdgeType::association();
        assert!(store.edge_between(refs[0], NodeId(2), &t).unwrap().is_some());
        assert!(store.edge_between(refs[1], NodeId(1), &t).unwrap().is_some());
        assert!(store.edge_between(refs[0], NodeId(3), &t).unwrap().is_none());
        assert!(store.edge_between(refs[0], NodeId(2), &EdgeType::new("OTHER")).unwrap().is_none());
    }

    #[test]
    fn test_delete_node_modes() {
        let (mut store, refs) = store_with_chain(&[1, 2, 3]);
        assert_eq!(
            store.delete_node(refs[1], DeleteMode::NodeOnly),
            Err(MemoryStoreError::NodeHasRelationships(refs[1]))
        );

        store.delete_node(refs[1], DeleteMode::NodeAndEdges).unwrap();
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.connection_count(&EdgeType::association()), 0);
        assert!(store.query_index(INDEX, IndexFor::Node, "id:2").unwrap().is_empty());
    }

    #[test]
    fn test_references_are_reused() {
        let (mut store, refs) = store_with_chain(&[1, 2]);
        store.delete_node(refs[0], DeleteMode::NodeAndEdges).unwrap();
        let reused = store.create_indexed_node(INDEX, NodeId(9)).unwrap();
        assert_eq!(reused, refs[0]);
        assert_eq!(store.node_id(reused).unwrap(), NodeId(9));
    }

    #[test]
    fn test_biggest_node_prefers_lowest_id_on_tie() {
        // 5 - 3 - 4 : node 3 has degree 2
        let (mut store, _) = store_with_chain(&[5, 3, 4]);
        let t = EdgeType::association();
        assert_eq!(store.biggest_node(&t).unwrap(), Some(NodeDegree { id: NodeId(3), degree: 2 }));

        // 4 - 6 gives 4 degree 2 as well; 3 keeps winning
        let four = store.query_index(INDEX, IndexFor::Node, "id:4").unwrap()[0].reference;
        let six = store.create_indexed_node(INDEX, NodeId(6)).unwrap();
        store.create_edge(four, six, &t).unwrap();
        assert_eq!(store.biggest_node(&t).unwrap(), Some(NodeDegree { id: NodeId(3), degree: 2 }));

        store.clear();
        assert_eq!(store.biggest_node(&t).unwrap(), None);
        assert!(store.index_exists(INDEX, IndexFor::Node));
    }

    #[test]
    fn test_bounded_paths_respect_depth() {
        let (store, refs) = store_with_chain(&[1, 2, 3, 4]);
        let within = store.bounded_paths(&PathQuery::new(refs[0], refs[3], 3)).unwrap();
        assert_eq!(within.len(), 1);
        assert_eq!(
            within[0].clone().into_node_ids(),
            vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]
        );

        let too_short = store.bounded_paths(&PathQuery::new(refs[0], refs[3], 2)).unwrap();
        assert!(too_short.is_empty());
    }

    #[test]
    fn test_bounded_paths_finds_every_simple_path() {
        // square 1-2-4, 1-3-4
        let mut store = MemoryStore::new();
        store.create_exact_match_index(INDEX, IndexFor::Node);
        let t = EdgeType::association();
        let n: Vec<NodeRef> = (1..=4).map(|id| store.create_indexed_node(INDEX, NodeId(id)).unwrap()).collect();
        store.create_edge(n[0], n[1], &t).unwrap();
        store.create_edge(n[1], n[3], &t).unwrap();
        store.create_edge(n[0], n[2], &t).unwrap();
        store.create_edge(n[3], n[2], &t).unwrap();

        let paths = store.bounded_paths(&PathQuery::new(n[0], n[3], 5)).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.len() == 2));
    }

    #[test]
    fn test_neighbourhood_is_bounded_and_paged() {
        let (store, refs) = store_with_chain(&[1, 2, 3, 4, 5]);
        let t = EdgeType::association();

        let one_hop = store.neighbourhood(refs[2], &t, 1, Paging::all()).unwrap();
        assert_eq!(
            one_hop,
            vec![Connection::new(NodeId(2), NodeId(3)), Connection::new(NodeId(3), NodeId(4))]
        );

        let two_hops = store.neighbourhood(refs[2], &t, 2, Paging::all()).unwrap();
        assert_eq!(two_hops.len(), 4);

        let paged = store.neighbourhood(refs[2], &t, 2, Paging::new(1, Some(2))).unwrap();
        assert_eq!(paged, two_hops[1..3].to_vec());

        assert!(store.neighbourhood(refs[2], &t, 0, Paging::all()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_client_counts_traversals() {
        let client = MemoryGraphClient::new();
        client.create_exact_match_index(INDEX, IndexFor::Node).await.unwrap();
        let a = client.create_indexed_node(INDEX, NodeId(1)).await.unwrap();
        let b = client.create_indexed_node(INDEX, NodeId(2)).await.unwrap();
        client.create_edge(a, b, &EdgeType::association()).await.unwrap();

        let paths = client.bounded_paths(&PathQuery::new(a, b, 3)).await.unwrap();
        assert_eq!(paths.len(), 1);
        client
            .neighbourhood(a, &EdgeType::association(), 1, Paging::all())
            .await
            .unwrap();
        assert_eq!(client.traversal_query_count(), 2);
    }
}
