//! Lazily opened connection of one graph to its store

use crate::client::{GraphClient, GraphClientPool};
use crate::config::{ConfigError, GraphSettings};
use crate::error::{AssocError, AssocResult};
use crate::index::NodeIndex;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error};

/// Client and node index of an opened graph
pub struct GraphHandle {
    pub client: Arc<dyn GraphClient>,
    pub index: NodeIndex,
}

/// Opens the store of a graph on first use.
///
/// Opening acquires the endpoint's client from the pool and makes sure the
/// node index exists. A failed open is reported to the caller and tried again
/// by the next operation.
pub struct GraphSession {
    graph_name: String,
    endpoint: Option<String>,
    pool: Arc<GraphClientPool>,
    handle: OnceCell<GraphHandle>,
}

impl GraphSession {
    pub fn new(settings: &GraphSettings, pool: Arc<GraphClientPool>) -> Self {
        Self {
            graph_name: settings.graph_name.clone(),
            endpoint: settings.endpoint.clone(),
            pool,
            handle: OnceCell::new(),
        }
    }

    pub fn graph_name(&self) -> &str {
        &self.graph_name
    }

    pub async fn open(&self) -> AssocResult<&GraphHandle> {
        self.handle.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> AssocResult<GraphHandle> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEndpoint(self.graph_name.clone()))?;

        let client = match self.pool.get_client(endpoint).await {
            Ok(client) => client,
            Err(source) => {
                error!(
                    "Acquiring a graph client for the graph {} with the url {} failed: {}",
                    self.graph_name, endpoint, source
                );
                return Err(AssocError::Connectivity {
                    graph: self.graph_name.clone(),
                    endpoint: endpoint.to_string(),
                    source,
                });
            }
        };

        let index = NodeIndex::new(Arc::clone(&client));
        index.ensure_index_exists().await?;

        debug!("Opened graph {} at {}", self.graph_name, endpoint);
        Ok(GraphHandle { client, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientConnector, ClientError, ClientResult, MemoryGraphClient};
    use async_trait::async_trait;

    struct Refusing;

    #[async_trait]
    impl ClientConnector for Refusing {
        async fn connect(&self, endpoint: &str) -> ClientResult<Arc<dyn GraphClient>> {
            Err(ClientError::Connection(format!("{} refused", endpoint)))
        }
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_a_configuration_error() {
        let pool = Arc::new(GraphClientPool::shared(Arc::new(MemoryGraphClient::new())));
        let session = GraphSession::new(&GraphSettings::unbound("notions"), pool);

        let err = session.open().await.err().unwrap();
        assert!(matches!(err, AssocError::Configuration(ConfigError::MissingEndpoint(name)) if name == "notions"));
    }

    #[tokio::test]
    async fn test_acquisition_failure_carries_context() {
        let pool = Arc::new(GraphClientPool::new(Arc::new(Refusing)));
        let session = GraphSession::new(&GraphSettings::new("notions", "http://nowhere:7474/db/data/"), pool);

        match session.open().await.err().unwrap() {
            AssocError::Connectivity { graph, endpoint, source } => {
                assert_eq!(graph, "notions");
                assert_eq!(endpoint, "http://nowhere:7474/db/data/");
                assert!(matches!(source, ClientError::Connection(_)));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_creates_the_node_index() {
        let client = Arc::new(MemoryGraphClient::new());
        let pool = Arc::new(GraphClientPool::shared(client.clone()));
        let session = GraphSession::new(&GraphSettings::new("notions", "memory://notions"), pool);

        let handle = session.open().await.unwrap();
        assert_eq!(handle.index.name(), crate::index::NODE_ID_INDEX);
        assert!(client
            .index_exists(crate::index::NODE_ID_INDEX, crate::graph::IndexFor::Node)
            .await
            .unwrap());
    }
}
