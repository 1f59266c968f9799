//! Process-wide registry of graph clients, one per endpoint address

use super::{ClientResult, GraphClient, HttpGraphClient};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

/// Opens a client for an endpoint address
#[async_trait]
pub trait ClientConnector: Send + Sync {
    async fn connect(&self, endpoint: &str) -> ClientResult<Arc<dyn GraphClient>>;
}

/// Opens `HttpGraphClient`s and checks the store answers before handing them out
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

#[async_trait]
impl ClientConnector for HttpConnector {
    async fn connect(&self, endpoint: &str) -> ClientResult<Arc<dyn GraphClient>> {
        let client = HttpGraphClient::new(endpoint);
        client.ping().await?;
        Ok(Arc::new(client))
    }
}

/// Hands out one given client whatever the address
///
/// Used for in-process stores, where every graph shares a single client.
#[derive(Clone)]
pub struct SharedClientConnector {
    client: Arc<dyn GraphClient>,
}

impl SharedClientConnector {
    pub fn new(client: Arc<dyn GraphClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClientConnector for SharedClientConnector {
    async fn connect(&self, _endpoint: &str) -> ClientResult<Arc<dyn GraphClient>> {
        Ok(Arc::clone(&self.client))
    }
}

type ClientSlot = Arc<OnceCell<Arc<dyn GraphClient>>>;

/// Client pool keyed by endpoint address
///
/// Concurrent first requests for one address share a single connect attempt.
/// A failed attempt is not remembered; the next request tries again.
pub struct GraphClientPool {
    connector: Arc<dyn ClientConnector>,
    clients: Mutex<HashMap<String, ClientSlot>>,
}

impl GraphClientPool {
    pub fn new(connector: Arc<dyn ClientConnector>) -> Self {
        Self {
            connector,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Pool connecting to remote stores over HTTP
    pub fn http() -> Self {
        Self::new(Arc::new(HttpConnector))
    }

    /// Pool that serves `client` for every address
    pub fn shared(client: Arc<dyn GraphClient>) -> Self {
        Self::new(Arc::new(SharedClientConnector::new(client)))
    }

    /// Get the client for `endpoint`, connecting on first use
    pub async fn get_client(&self, endpoint: &str) -> ClientResult<Arc<dyn GraphClient>> {
        let key = endpoint.trim().to_string();

        let slot = {
            let mut clients = self.clients.lock().await;
            Arc::clone(clients.entry(key.clone()).or_default())
        };

        let client = slot
            .get_or_try_init(|| async {
                info!("Connecting graph client to {}", key);
                self.connector.connect(&key).await
            })
            .await?;

        debug!("Serving graph client for {}", key);
        Ok(Arc::clone(client))
    }

    /// Number of addresses with a connected client
    pub async fn connected_count(&self) -> usize {
        let clients = self.clients.lock().await;
        clients.values().filter(|slot| slot.initialized()).count()
    }
}
