//! Per-graph info record: the biggest node and its neighbour count

use super::{StatsError, StatsResult};
use crate::cache::{CacheKey, QueryCache};
use crate::graph::NodeId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Biggest-node statistic of one graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphInfo {
    /// `None` while the graph has no connections
    pub biggest_node_id: Option<NodeId>,
    pub biggest_node_neighbour_count: u64,
}

/// Stored form of [`GraphInfo`], unique by graph name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphInfoRecord {
    pub id: u64,
    pub graph_name: String,
    pub biggest_node_id: Option<NodeId>,
    pub biggest_node_neighbour_count: u64,
}

impl GraphInfoRecord {
    pub fn info(&self) -> GraphInfo {
        GraphInfo {
            biggest_node_id: self.biggest_node_id,
            biggest_node_neighbour_count: self.biggest_node_neighbour_count,
        }
    }
}

/// Durable storage of graph info records
#[async_trait]
pub trait GraphInfoRepository: Send + Sync {
    async fn find_by_name(&self, graph_name: &str) -> StatsResult<Option<GraphInfoRecord>>;

    /// Create an empty record; fails with `DuplicateGraphName` if one exists
    async fn create(&self, graph_name: &str) -> StatsResult<GraphInfoRecord>;

    async fn get(&self, id: u64) -> StatsResult<GraphInfoRecord>;

    async fn update(&self, record: &GraphInfoRecord) -> StatsResult<()>;
}

#[derive(Default)]
struct RepositoryState {
    records: HashMap<u64, GraphInfoRecord>,
    by_name: HashMap<String, u64>,
    next_id: u64,
}

/// In-process repository
#[derive(Default)]
pub struct MemoryGraphInfoRepository {
    state: RwLock<RepositoryState>,
}

impl MemoryGraphInfoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }
}

#[async_trait]
impl GraphInfoRepository for MemoryGraphInfoRepository {
    async fn find_by_name(&self, graph_name: &str) -> StatsResult<Option<GraphInfoRecord>> {
        let state = self.state.read().await;
        Ok(state
            .by_name
            .get(graph_name)
            .and_then(|id| state.records.get(id))
            .cloned())
    }

    async fn create(&self, graph_name: &str) -> StatsResult<GraphInfoRecord> {
        let mut state = self.state.write().await;
        if state.by_name.contains_key(graph_name) {
            return Err(StatsError::DuplicateGraphName(graph_name.to_string()));
        }

        state.next_id += 1;
        let record = GraphInfoRecord {
            id: state.next_id,
            graph_name: graph_name.to_string(),
            biggest_node_id: None,
            biggest_node_neighbour_count: 0,
        };
        state.by_name.insert(graph_name.to_string(), record.id);
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: u64) -> StatsResult<GraphInfoRecord> {
        self.state
            .read()
            .await
            .records
            .get(&id)
            .cloned()
            .ok_or(StatsError::RecordNotFound(id))
    }

    async fn update(&self, record: &GraphInfoRecord) -> StatsResult<()> {
        let mut state = self.state.write().await;
        match state.records.get_mut(&record.id) {
            Some(stored) => {
                stored.biggest_node_id = record.biggest_node_id;
                stored.biggest_node_neighbour_count = record.biggest_node_neighbour_count;
                Ok(())
            }
            None => Err(StatsError::RecordNotFound(record.id)),
        }
    }
}

/// Get-or-create access to graph info records by graph name
///
/// The name to record id mapping is memoized in the query cache; the
/// record itself is always read fresh.
#[derive(Clone)]
pub struct GraphInfoService {
    repository: Arc<dyn GraphInfoRepository>,
    cache: Arc<QueryCache>,
}

impl GraphInfoService {
    pub fn new(repository: Arc<dyn GraphInfoRepository>, cache: Arc<QueryCache>) -> Self {
        Self { repository, cache }
    }

    async fn record_id(&self, graph_name: &str) -> StatsResult<u64> {
        let key = CacheKey::GraphInfoId {
            graph: graph_name.to_string(),
        };

        self.cache
            .get(key, || async {
                if let Some(record) = self.repository.find_by_name(graph_name).await? {
                    return Ok(record.id);
                }

                match self.repository.create(graph_name).await {
                    Ok(record) => {
                        info!("Created graph info record {} for graph {}", record.id, graph_name);
                        Ok(record.id)
                    }
                    // Another caller created it first
                    Err(StatsError::DuplicateGraphName(_)) => self
                        .repository
                        .find_by_name(graph_name)
                        .await?
                        .map(|record| record.id)
                        .ok_or_else(|| StatsError::Repository(format!("graph info of {} vanished", graph_name))),
                    Err(e) => Err(e),
                }
            })
            .await
    }

    /// Record of `graph_name`, created on first access
    pub async fn record(&self, graph_name: &str) -> StatsResult<GraphInfoRecord> {
        let id = self.record_id(graph_name).await?;
        self.repository.get(id).await
    }

    pub async fn graph_info(&self, graph_name: &str) -> StatsResult<GraphInfo> {
        Ok(self.record(graph_name).await?.info())
    }

    pub async fn set_biggest_node(
        &self,
        graph_name: &str,
        node: Option<NodeId>,
        neighbour_count: u64,
    ) -> StatsResult<()> {
        let mut record = self.record(graph_name).await?;
        record.biggest_node_id = node;
        record.biggest_node_neighbour_count = neighbour_count;
        self.repository.update(&record).await?;

        debug!(
            "Biggest node of graph {} is now {:?} with {} neighbours",
            graph_name, node, neighbour_count
        );
        Ok(())
    }
}
