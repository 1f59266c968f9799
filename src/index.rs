//! Exact-match index from node id to store reference

use crate::client::{ClientResult, GraphClient};
use crate::graph::{IndexFor, NodeId, NodeRef};
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the node id index in every graph store
pub const NODE_ID_INDEX: &str = "NodeIds";

/// Node index of one graph
#[derive(Clone)]
pub struct NodeIndex {
    client: Arc<dyn GraphClient>,
    name: String,
}

impl NodeIndex {
    pub fn new(client: Arc<dyn GraphClient>) -> Self {
        Self::with_name(client, NODE_ID_INDEX)
    }

    pub fn with_name(client: Arc<dyn GraphClient>, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create the index unless the store already has it
    pub async fn ensure_index_exists(&self) -> ClientResult<()> {
        if self.client.index_exists(&self.name, IndexFor::Node).await? {
            debug!("Index {} already exists", self.name);
            return Ok(());
        }

        self.client
            .create_exact_match_index(&self.name, IndexFor::Node)
            .await?;
        info!("Created node index {}", self.name);
        Ok(())
    }

    pub async fn lookup(&self, id: NodeId) -> ClientResult<Option<NodeRef>> {
        let hits = self
            .client
            .query_index(&self.name, IndexFor::Node, &format!("id:{}", id))
            .await?;
        Ok(hits.first().map(|node| node.reference))
    }

    /// Reference of the node carrying `id`, creating the node if needed.
    ///
    /// The flag is `true` when the node was created by this call.
    pub async fn add_or_get(&self, id: NodeId) -> ClientResult<(NodeRef, bool)> {
        if let Some(reference) = self.lookup(id).await? {
            return Ok((reference, false));
        }

        let reference = self.client.create_indexed_node(&self.name, id).await?;
        debug!("Created node {} as {}", id, reference);
        Ok((reference, true))
    }
}
