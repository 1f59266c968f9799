//! Connections, paths and the graphs assembled from them

use super::types::NodeId;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// An undirected association between two nodes
///
/// Always stored normalized (`node1 <= node2`) so `(a, b)` and `(b, a)`
/// compare and hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Connection {
    pub node1: NodeId,
    pub node2: NodeId,
}

impl Connection {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Connection { node1: a, node2: b }
        } else {
            Connection { node1: b, node2: a }
        }
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.node1 == node || self.node2 == node
    }

    /// The endpoint opposite to `node`, if `node` is an endpoint at all
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.node1 == node {
            Some(self.node2)
        } else if self.node2 == node {
            Some(self.node1)
        } else {
            None
        }
    }
}

/// Paging window applied at the connection level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Paging {
    pub skip: usize,
    /// `None` takes everything after `skip`
    pub take: Option<usize>,
}

impl Paging {
    pub fn new(skip: usize, take: Option<usize>) -> Self {
        Self { skip, take }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.skip == 0 && self.take.is_none()
    }
}

/// Node and edge sets of a (sub)graph, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathGraph {
    nodes: IndexSet<NodeId>,
    connections: IndexSet<Connection>,
}

impl PathGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of every node and consecutive pair appearing in `paths`
    pub fn from_paths<'a, I>(paths: I) -> Self
    where
        I: IntoIterator<Item = &'a Vec<NodeId>>,
    {
        let mut graph = Self::new();
        for path in paths {
            graph.add_path(path);
        }
        graph
    }

    pub fn from_connections<I>(connections: I) -> Self
    where
        I: IntoIterator<Item = Connection>,
    {
        let mut graph = Self::new();
        for connection in connections {
            graph.add_connection(connection);
        }
        graph
    }

    pub fn add_path(&mut self, path: &[NodeId]) {
        if let [single] = path {
            self.nodes.insert(*single);
        }
        for pair in path.windows(2) {
            self.add_connection(Connection::new(pair[0], pair[1]));
        }
    }

    pub fn add_connection(&mut self, connection: Connection) {
        self.nodes.insert(connection.node1);
        self.nodes.insert(connection.node2);
        self.connections.insert(connection);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.connections.iter().copied()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn contains_connection(&self, a: NodeId, b: NodeId) -> bool {
        self.connections.contains(&Connection::new(a, b))
    }

    /// Whether every step of `path` is an edge of this graph
    pub fn contains_path(&self, path: &[NodeId]) -> bool {
        if path.is_empty() {
            return false;
        }
        path.iter().all(|n| self.contains_node(*n))
            && path.windows(2).all(|pair| self.contains_connection(pair[0], pair[1]))
    }

    /// Sub-graph made of the connections inside the paging window
    pub fn page(&self, paging: Paging) -> PathGraph {
        let window = self.connections.iter().skip(paging.skip);
        match paging.take {
            Some(take) => PathGraph::from_connections(window.take(take).copied()),
            None => PathGraph::from_connections(window.copied()),
        }
    }
}

/// Outcome of a path search between two nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    /// Every discovered path, start node first
    pub succeeded_paths: Vec<Vec<NodeId>>,
    /// Union of the nodes and edges of `succeeded_paths`
    pub succeeded_graph: PathGraph,
}

impl PathResult {
    pub fn from_paths(paths: Vec<Vec<NodeId>>) -> Self {
        let succeeded_graph = PathGraph::from_paths(&paths);
        Self {
            succeeded_paths: paths,
            succeeded_graph,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded_paths.is_empty()
    }
}
