//! Query result cache with per-graph invalidation
//!
//! Results are stored in a bounded LRU map. An entry holds a once-cell, so
//! concurrent requests for the same key wait for one in-flight computation
//! instead of repeating it. Failed computations leave the cell empty and the
//! next request computes again.
//!
//! Monitored entries are tagged with a graph name. [`QueryCache::invalidate_graph`]
//! drops every entry carrying the tag; registering the cache on a
//! [`GraphEventBus`](crate::graph::GraphEventBus) ties this to mutation
//! events. There is no time-based expiry.

use crate::graph::{GraphEvent, GraphEventHandler, NodeId, Paging};
use lru::LruCache;
use std::any::Any;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Identity of a cached query result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Paths {
        graph: String,
        start: NodeId,
        target: NodeId,
        max_distance: usize,
    },
    PartialBase {
        graph: String,
        center: NodeId,
        max_distance: usize,
        paging: Paging,
    },
    PartialView {
        graph: String,
        center: NodeId,
        max_distance: usize,
        base: Paging,
        view: Paging,
    },
    GraphInfoId {
        graph: String,
    },
}

impl CacheKey {
    pub fn graph(&self) -> &str {
        match self {
            CacheKey::Paths { graph, .. }
            | CacheKey::PartialBase { graph, .. }
            | CacheKey::PartialView { graph, .. }
            | CacheKey::GraphInfoId { graph } => graph,
        }
    }
}

struct CacheEntry {
    /// Set for monitored entries
    graph: Option<String>,
    /// An `OnceCell<T>` for the value type the entry was created with
    cell: Arc<dyn Any + Send + Sync>,
}

/// Bounded, shareable query cache
pub struct QueryCache {
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
}

impl QueryCache {
    /// Cache holding at most `capacity` results (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<CacheKey, CacheEntry>> {
        // Entries stay consistent even if a holder panicked
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot<T>(&self, key: &CacheKey, graph: Option<&str>) -> Arc<OnceCell<T>>
    where
        T: Send + Sync + 'static,
    {
        let mut entries = self.entries();

        if let Some(entry) = entries.get(key) {
            match Arc::clone(&entry.cell).downcast::<OnceCell<T>>() {
                Ok(cell) => return cell,
                Err(_) => warn!("Cache entry {:?} holds another value type; replacing it", key),
            }
        }

        let cell = Arc::new(OnceCell::new());
        entries.put(
            key.clone(),
            CacheEntry {
                graph: graph.map(str::to_string),
                cell: Arc::clone(&cell) as Arc<dyn Any + Send + Sync>,
            },
        );
        cell
    }

    async fn resolve<T, F, Fut, E>(&self, key: CacheKey, graph: Option<&str>, populate: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cell = self.slot::<T>(&key, graph);
        if let Some(value) = cell.get() {
            debug!("Cache hit for {:?}", key);
            return Ok(value.clone());
        }

        debug!("Cache miss for {:?}", key);
        cell.get_or_try_init(populate).await.cloned()
    }

    /// Cached value for `key`, computed by `populate` on a miss
    ///
    /// The entry is only evicted by capacity, never by graph invalidation.
    pub async fn get<T, F, Fut, E>(&self, key: CacheKey, populate: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.resolve(key, None, populate).await
    }

    /// As [`get`](Self::get), and the entry is dropped by the next
    /// invalidation of `graph`
    pub async fn get_monitored<T, F, Fut, E>(&self, graph: &str, key: CacheKey, populate: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.resolve(key, Some(graph), populate).await
    }

    /// Drop every monitored entry of `graph`; returns how many were dropped
    pub fn invalidate_graph(&self, graph: &str) -> usize {
        let mut entries = self.entries();

        let stale: Vec<CacheKey> = entries
            .iter()
            .filter(|(_, entry)| entry.graph.as_deref() == Some(graph))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            entries.pop(key);
        }

        if !stale.is_empty() {
            debug!("Invalidated {} cached results of graph {}", stale.len(), graph);
        }
        stale.len()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries().contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

impl GraphEventHandler for QueryCache {
    fn handle(&self, event: &GraphEvent) {
        self.invalidate_graph(event.graph());
    }
}
