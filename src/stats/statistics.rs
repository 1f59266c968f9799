//! Graph statistics aggregate

use super::StatsResult;
use crate::graph::NodeId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Point-in-time view of a graph's statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphStatisticsSnapshot {
    pub node_count: u64,
    pub connection_count: u64,
    pub central_node_id: Option<NodeId>,
}

/// Counters the connection manager keeps up to date.
///
/// Deltas are applied incrementally on every mutation; `set_counts` overwrites
/// both counters during a rebuild. Counters never go below zero.
#[async_trait]
pub trait GraphStatistics: Send + Sync {
    async fn adjust_node_count(&self, delta: i64) -> StatsResult<()>;

    async fn adjust_connection_count(&self, delta: i64) -> StatsResult<()>;

    async fn set_central_node_id(&self, node: Option<NodeId>) -> StatsResult<()>;

    async fn set_counts(&self, node_count: u64, connection_count: u64) -> StatsResult<()>;

    async fn snapshot(&self) -> StatsResult<GraphStatisticsSnapshot>;
}

fn apply_delta(count: u64, delta: i64) -> u64 {
    if delta >= 0 {
        count.saturating_add(delta as u64)
    } else {
        count.saturating_sub(delta.unsigned_abs())
    }
}

/// In-process statistics of one graph
#[derive(Default)]
pub struct MemoryGraphStatistics {
    inner: RwLock<GraphStatisticsSnapshot>,
}

impl MemoryGraphStatistics {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GraphStatistics for MemoryGraphStatistics {
    async fn adjust_node_count(&self, delta: i64) -> StatsResult<()> {
        let mut stats = self.inner.write().await;
        stats.node_count = apply_delta(stats.node_count, delta);
        Ok(())
    }

    async fn adjust_connection_count(&self, delta: i64) -> StatsResult<()> {
        let mut stats = self.inner.write().await;
        stats.connection_count = apply_delta(stats.connection_count, delta);
        Ok(())
    }

    async fn set_central_node_id(&self, node: Option<NodeId>) -> StatsResult<()> {
        self.inner.write().await.central_node_id = node;
        Ok(())
    }

    async fn set_counts(&self, node_count: u64, connection_count: u64) -> StatsResult<()> {
        let mut stats = self.inner.write().await;
        stats.node_count = node_count;
        stats.connection_count = connection_count;
        Ok(())
    }

    async fn snapshot(&self) -> StatsResult<GraphStatisticsSnapshot> {
        Ok(*self.inner.read().await)
    }
}
