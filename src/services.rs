//! Composition root for the services of one graph

use crate::cache::QueryCache;
use crate::client::{GraphClientPool, MemoryGraphClient};
use crate::config::GraphSettings;
use crate::graph::GraphEventBus;
use crate::manager::ConnectionManager;
use crate::pathfinder::PathFinder;
use crate::stats::{GraphInfoRepository, GraphInfoService, GraphStatistics, MemoryGraphInfoRepository, MemoryGraphStatistics};
use std::sync::Arc;

/// Connection manager and path finder of one graph, sharing a query cache
///
/// The cache is subscribed to the event bus, so every mutation made through
/// `manager` drops the cached path and partial graph results of the graph.
#[derive(Clone)]
pub struct GraphServices {
    pub manager: ConnectionManager,
    pub path_finder: PathFinder,
    pub cache: Arc<QueryCache>,
}

impl GraphServices {
    pub fn build(
        settings: &GraphSettings,
        pool: Arc<GraphClientPool>,
        repository: Arc<dyn GraphInfoRepository>,
        statistics: Arc<dyn GraphStatistics>,
        events: GraphEventBus,
    ) -> Self {
        let cache = Arc::new(QueryCache::new(settings.cache_capacity));
        let events = Arc::new(events.subscribe(cache.clone()));
        let info = GraphInfoService::new(repository, cache.clone());

        Self {
            manager: ConnectionManager::new(settings, pool.clone(), info, statistics, events),
            path_finder: PathFinder::new(settings, pool, cache.clone()),
            cache,
        }
    }

    /// Services over a fresh in-process store
    pub fn in_memory(settings: &GraphSettings) -> (Self, Arc<MemoryGraphClient>) {
        let client = Arc::new(MemoryGraphClient::new());
        let services = Self::build(
            settings,
            Arc::new(GraphClientPool::shared(client.clone())),
            Arc::new(MemoryGraphInfoRepository::new()),
            Arc::new(MemoryGraphStatistics::new()),
            GraphEventBus::new(),
        );
        (services, client)
    }
}
