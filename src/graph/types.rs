//! Core type definitions for the association graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a content entity inside one named graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Store-internal reference to a node record
///
/// Only meaningful to the client that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeRef(pub u64);

impl NodeRef {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({})", self.0)
    }
}

/// Store-internal reference to a relationship record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeRef(pub u64);

impl EdgeRef {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeRef({})", self.0)
    }
}

/// Relationship type stored on every edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeType(String);

impl EdgeType {
    /// The one relationship type association edges are created with
    pub const ASSOCIATION: &'static str = "ASSOCIATIVY_CONNECTION";

    pub fn new(edge_type: impl Into<String>) -> Self {
        EdgeType(edge_type.into())
    }

    pub fn association() -> Self {
        EdgeType(Self::ASSOCIATION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EdgeType {
    fn default() -> Self {
        Self::association()
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EdgeType {
    fn from(s: &str) -> Self {
        EdgeType(s.to_string())
    }
}

/// Entity kind an index is declared on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexFor {
    Node,
    Relationship,
}

/// How much a node deletion removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Fails in the store if the node still has relationships
    NodeOnly,
    NodeAndEdges,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(format!("{}", id), "42");

        let id2: NodeId = 100.into();
        assert_eq!(id2.as_u64(), 100);
    }

    #[test]
    fn test_node_id_serializes_as_plain_integer() {
        assert_eq!(serde_json::to_string(&NodeId(7)).unwrap(), "7");
        let parsed: NodeId = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, NodeId(12));
    }

    #[test]
    fn test_edge_type() {
        let edge_type = EdgeType::default();
        assert_eq!(edge_type.as_str(), EdgeType::ASSOCIATION);
        assert_eq!(format!("{}", EdgeType::new("KNOWS")), "KNOWS");
    }
}
