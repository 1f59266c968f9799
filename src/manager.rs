//! Connection manager
//!
//! Mutations and simple queries over one association graph. Every mutation
//! keeps the graph statistics and the biggest-node record up to date and
//! publishes a [`GraphEvent`] once the store change has been made.
//!
//! Operations are not serialized against each other. Concurrent mutations of
//! the same nodes may leave the biggest-node statistic stale;
//! [`ConnectionManager::rebuild_statistics`] recomputes everything from the
//! store.

use crate::client::{GraphClientPool, NodeDegree};
use crate::config::GraphSettings;
use crate::error::AssocResult;
use crate::graph::{Connection, DeleteMode, EdgeRef, EdgeType, GraphEvent, GraphEventBus, NodeId, NodeRef, Paging};
use crate::session::{GraphHandle, GraphSession};
use crate::stats::{GraphInfo, GraphInfoService, GraphStatistics, GraphStatisticsSnapshot};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

struct ManagerInner {
    session: GraphSession,
    edge_type: EdgeType,
    info: GraphInfoService,
    statistics: Arc<dyn GraphStatistics>,
    events: Arc<GraphEventBus>,
}

/// Connection manager of one graph; cheap to clone
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<ManagerInner>,
}

impl ConnectionManager {
    pub fn new(
        settings: &GraphSettings,
        pool: Arc<GraphClientPool>,
        info: GraphInfoService,
        statistics: Arc<dyn GraphStatistics>,
        events: Arc<GraphEventBus>,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                session: GraphSession::new(settings, pool),
                edge_type: EdgeType::association(),
                info,
                statistics,
                events,
            }),
        }
    }

    pub fn graph_name(&self) -> &str {
        self.inner.session.graph_name()
    }

    async fn store(&self) -> AssocResult<&GraphHandle> {
        self.inner.session.open().await
    }

    async fn edge_between(&self, store: &GraphHandle, node1: NodeId, node2: NodeId) -> AssocResult<Option<EdgeRef>> {
        match store.index.lookup(node1).await? {
            Some(reference) => Ok(store
                .client
                .edge_between(reference, node2, &self.inner.edge_type)
                .await?),
            None => Ok(None),
        }
    }

    async fn count_edges(&self, store: &GraphHandle, node: NodeRef) -> AssocResult<u64> {
        Ok(store.client.count_edges(node, &self.inner.edge_type).await?)
    }

    /// A node is its own neighbour; otherwise an association edge must exist
    pub async fn are_neighbours(&self, node1: NodeId, node2: NodeId) -> AssocResult<bool> {
        if node1 == node2 {
            return Ok(true);
        }

        let store = self.store().await?;
        Ok(self.edge_between(store, node1, node2).await?.is_some())
    }

    /// Create the edge between two nodes, creating missing nodes
    pub async fn connect(&self, node1: NodeId, node2: NodeId) -> AssocResult<()> {
        let store = self.store().await?;

        if self.are_neighbours(node1, node2).await? {
            return Ok(());
        }

        let reference1 = self.add_or_get(store, node1).await?;
        let reference2 = self.add_or_get(store, node2).await?;
        store
            .client
            .create_edge(reference1, reference2, &self.inner.edge_type)
            .await?;

        let info = self.biggest_node().await?;
        let degree1 = self.count_edges(store, reference1).await?;
        if degree1 > info.biggest_node_neighbour_count {
            self.set_biggest_node(Some(node1), degree1).await?;
        } else {
            let degree2 = self.count_edges(store, reference2).await?;
            if degree2 > info.biggest_node_neighbour_count {
                self.set_biggest_node(Some(node2), degree2).await?;
            }
        }

        self.inner.statistics.adjust_connection_count(1).await?;

        debug!("Connected {} and {} in graph {}", node1, node2, self.graph_name());
        self.inner.events.publish(GraphEvent::ConnectionAdded {
            graph: self.graph_name().to_string(),
            node1,
            node2,
        });
        Ok(())
    }

    async fn add_or_get(&self, store: &GraphHandle, node: NodeId) -> AssocResult<NodeRef> {
        let (reference, created) = store.index.add_or_get(node).await?;
        if created {
            self.inner.statistics.adjust_node_count(1).await?;
        }
        Ok(reference)
    }

    /// Remove the edge between two nodes, and every endpoint left without edges
    pub async fn disconnect(&self, node1: NodeId, node2: NodeId) -> AssocResult<()> {
        let store = self.store().await?;

        if node1 == node2 {
            return Ok(());
        }

        let Some(reference1) = store.index.lookup(node1).await? else {
            return Ok(());
        };
        let Some(edge) = store
            .client
            .edge_between(reference1, node2, &self.inner.edge_type)
            .await?
        else {
            return Ok(());
        };

        store.client.delete_edge(edge).await?;

        let mut removed_nodes = 0;
        if self.remove_if_isolated(store, reference1).await? {
            removed_nodes += 1;
        }
        if let Some(reference2) = store.index.lookup(node2).await? {
            if self.remove_if_isolated(store, reference2).await? {
                removed_nodes += 1;
            }
        }
        if removed_nodes > 0 {
            self.inner.statistics.adjust_node_count(-removed_nodes).await?;
        }

        let info = self.biggest_node().await?;
        if info.biggest_node_id == Some(node1) || info.biggest_node_id == Some(node2) {
            self.find_biggest_node(store).await?;
        }

        self.inner.statistics.adjust_connection_count(-1).await?;

        debug!("Disconnected {} and {} in graph {}", node1, node2, self.graph_name());
        self.inner.events.publish(GraphEvent::ConnectionDeleted {
            graph: self.graph_name().to_string(),
            node1,
            node2,
        });
        Ok(())
    }

    async fn remove_if_isolated(&self, store: &GraphHandle, node: NodeRef) -> AssocResult<bool> {
        if self.count_edges(store, node).await? > 0 {
            return Ok(false);
        }
        store.client.delete_node(node, DeleteMode::NodeOnly).await?;
        Ok(true)
    }

    /// Delete a node together with all of its edges
    ///
    /// Neighbours left without edges are deleted too.
    pub async fn delete_from_node(&self, node: NodeId) -> AssocResult<()> {
        let store = self.store().await?;

        let Some(reference) = store.index.lookup(node).await? else {
            return Ok(());
        };

        let neighbours = store
            .client
            .neighbour_ids(reference, &self.inner.edge_type, Paging::all())
            .await?;
        let degree = neighbours.len() as i64;

        store
            .client
            .delete_node(reference, DeleteMode::NodeAndEdges)
            .await?;

        let mut removed_nodes = 1;
        for neighbour in neighbours {
            if let Some(neighbour_ref) = store.index.lookup(neighbour).await? {
                if self.remove_if_isolated(store, neighbour_ref).await? {
                    removed_nodes += 1;
                }
            }
        }

        self.inner.statistics.adjust_connection_count(-degree).await?;
        self.inner.statistics.adjust_node_count(-removed_nodes).await?;

        let info = self.biggest_node().await?;
        if info.biggest_node_id == Some(node) {
            self.find_biggest_node(store).await?;
        }

        debug!("Deleted node {} from graph {}", node, self.graph_name());
        self.inner.events.publish(GraphEvent::ConnectionsDeletedFromNode {
            graph: self.graph_name().to_string(),
            node,
        });
        Ok(())
    }

    /// Every connection of the graph, once each, paged
    pub async fn get_all(&self, paging: Paging) -> AssocResult<Vec<Connection>> {
        let store = self.store().await?;
        Ok(store
            .client
            .connections(&self.inner.edge_type, paging)
            .await?)
    }

    pub async fn get_neighbour_ids(&self, node: NodeId, paging: Paging) -> AssocResult<Vec<NodeId>> {
        let store = self.store().await?;
        match store.index.lookup(node).await? {
            Some(reference) => Ok(store
                .client
                .neighbour_ids(reference, &self.inner.edge_type, paging)
                .await?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn get_neighbour_count(&self, node: NodeId) -> AssocResult<u64> {
        let store = self.store().await?;
        match store.index.lookup(node).await? {
            Some(reference) => self.count_edges(store, reference).await,
            None => Ok(0),
        }
    }

    /// Node count, connection count and central node
    pub async fn get_graph_info(&self) -> AssocResult<GraphStatisticsSnapshot> {
        Ok(self.inner.statistics.snapshot().await?)
    }

    /// Recorded biggest node and its neighbour count
    pub async fn biggest_node(&self) -> AssocResult<GraphInfo> {
        Ok(self.inner.info.graph_info(self.graph_name()).await?)
    }

    /// Recompute all statistics from the store
    ///
    /// Node and connection counts are queried concurrently, then the biggest
    /// node is searched.
    pub async fn rebuild_statistics(&self) -> AssocResult<GraphStatisticsSnapshot> {
        let store = self.store().await?;
        info!("Rebuilding statistics of graph {}", self.graph_name());

        let (node_count, connection_count) = futures::try_join!(
            store.client.node_count(),
            store.client.connection_count(&self.inner.edge_type)
        )?;
        let node_count = node_count.saturating_sub(store.client.reserved_node_count());

        self.inner
            .statistics
            .set_counts(node_count, connection_count)
            .await?;
        self.find_biggest_node(store).await?;

        let snapshot = self.inner.statistics.snapshot().await?;
        info!(
            "Rebuilt statistics of graph {}: {} nodes, {} connections",
            self.graph_name(),
            snapshot.node_count,
            snapshot.connection_count
        );
        Ok(snapshot)
    }

    /// Run [`rebuild_statistics`](Self::rebuild_statistics) as a background task
    pub fn spawn_rebuild_statistics(&self) -> JoinHandle<AssocResult<GraphStatisticsSnapshot>> {
        let manager = self.clone();
        tokio::spawn(async move { manager.rebuild_statistics().await })
    }

    async fn find_biggest_node(&self, store: &GraphHandle) -> AssocResult<()> {
        match store.client.biggest_node(&self.inner.edge_type).await? {
            Some(NodeDegree { id, degree }) => {
                info!("Biggest node of graph {} is {} ({} neighbours)", self.graph_name(), id, degree);
                self.set_biggest_node(Some(id), degree).await
            }
            None => {
                info!("Graph {} has no connections left", self.graph_name());
                self.set_biggest_node(None, 0).await
            }
        }
    }

    async fn set_biggest_node(&self, node: Option<NodeId>, neighbour_count: u64) -> AssocResult<()> {
        self.inner
            .info
            .set_biggest_node(self.graph_name(), node, neighbour_count)
            .await?;
        self.inner.statistics.set_central_node_id(node).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use crate::client::MemoryGraphClient;
    use crate::stats::{MemoryGraphInfoRepository, MemoryGraphStatistics};

    fn manager() -> ConnectionManager {
        let client = Arc::new(MemoryGraphClient::new());
        let pool = Arc::new(GraphClientPool::shared(client));
        let cache = Arc::new(QueryCache::new(64));
        let info = GraphInfoService::new(Arc::new(MemoryGraphInfoRepository::new()), cache);
        ConnectionManager::new(
            &GraphSettings::new("notions", "memory://notions"),
            pool,
            info,
            Arc::new(MemoryGraphStatistics::new()),
            Arc::new(GraphEventBus::new()),
        )
    }

    #[tokio::test]
    async fn test_node_is_its_own_neighbour() {
        let manager = manager();
        assert!(manager.are_neighbours(NodeId(1), NodeId(1)).await.unwrap());
        assert!(!manager.are_neighbours(NodeId(1), NodeId(2)).await.unwrap());
    }

    #[tokio::test]
    async fn test_connect_tracks_biggest_node() {
        let manager = manager();
        manager.connect(NodeId(1), NodeId(2)).await.unwrap();
        assert_eq!(manager.biggest_node().await.unwrap().biggest_node_id, Some(NodeId(1)));

        manager.connect(NodeId(2), NodeId(3)).await.unwrap();
        let info = manager.biggest_node().await.unwrap();
        assert_eq!(info.biggest_node_id, Some(NodeId(2)));
        assert_eq!(info.biggest_node_neighbour_count, 2);

        // Equal degree keeps the recorded node
        manager.connect(NodeId(3), NodeId(4)).await.unwrap();
        assert_eq!(manager.biggest_node().await.unwrap().biggest_node_id, Some(NodeId(2)));

        let stats = manager.get_graph_info().await.unwrap();
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.connection_count, 3);
        assert_eq!(stats.central_node_id, Some(NodeId(2)));
    }

    #[tokio::test]
    async fn test_disconnect_recomputes_biggest_node() {
        let manager = manager();
        manager.connect(NodeId(1), NodeId(2)).await.unwrap();
        manager.connect(NodeId(1), NodeId(3)).await.unwrap();
        manager.connect(NodeId(4), NodeId(5)).await.unwrap();

        manager.disconnect(NodeId(1), NodeId(2)).await.unwrap();
        let info = manager.biggest_node().await.unwrap();
        assert_eq!(info.biggest_node_id, Some(NodeId(1)));
        assert_eq!(info.biggest_node_neighbour_count, 1);

        let stats = manager.get_graph_info().await.unwrap();
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.connection_count, 2);
    }

    #[tokio::test]
    async fn test_absent_nodes_read_as_empty() {
        let manager = manager();
        assert!(manager.get_neighbour_ids(NodeId(9), Paging::all()).await.unwrap().is_empty());
        assert_eq!(manager.get_neighbour_count(NodeId(9)).await.unwrap(), 0);
        manager.delete_from_node(NodeId(9)).await.unwrap();
        manager.disconnect(NodeId(9), NodeId(8)).await.unwrap();
        assert_eq!(manager.get_graph_info().await.unwrap(), GraphStatisticsSnapshot::default());
    }

    #[tokio::test]
    async fn test_spawned_rebuild() {
        let manager = manager();
        manager.connect(NodeId(1), NodeId(2)).await.unwrap();

        let snapshot = manager.spawn_rebuild_statistics().await.unwrap().unwrap();
        assert_eq!(snapshot.node_count, 2);
        assert_eq!(snapshot.connection_count, 1);
        assert_eq!(snapshot.central_node_id, Some(NodeId(1)));
    }
}
