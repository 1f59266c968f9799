//! Path finder
//!
//! Read-only queries over one association graph:
//!
//! - [`PathFinder::find_paths`] lists every path of at most `max_distance`
//!   edges between two nodes, plus the graph those paths span
//! - [`PathFinder::get_partial_graph`] returns a [`QueryableGraph`] of the
//!   neighbourhood of a node, computed when first enumerated
//!
//! Results go through the query cache when the settings ask for it. Cached
//! entries are tagged with the graph name so mutations of the graph drop them.

mod queryable;

pub use queryable::QueryableGraph;

use crate::cache::{CacheKey, QueryCache};
use crate::client::{GraphClientPool, PathQuery, RawPath};
use crate::config::{GraphSettings, PathFinderSettings};
use crate::error::AssocResult;
use crate::graph::{EdgeType, NodeId, Paging, PathGraph, PathResult};
use crate::session::{GraphHandle, GraphSession};
use std::sync::Arc;
use tracing::debug;

struct FinderInner {
    session: GraphSession,
    edge_type: EdgeType,
    cache: Arc<QueryCache>,
    defaults: PathFinderSettings,
}

/// Path finder of one graph; cheap to clone
#[derive(Clone)]
pub struct PathFinder {
    inner: Arc<FinderInner>,
}

impl PathFinder {
    pub fn new(settings: &GraphSettings, pool: Arc<GraphClientPool>, cache: Arc<QueryCache>) -> Self {
        Self {
            inner: Arc::new(FinderInner {
                session: GraphSession::new(settings, pool),
                edge_type: EdgeType::association(),
                cache,
                defaults: settings.path_finder,
            }),
        }
    }

    pub fn graph_name(&self) -> &str {
        self.inner.session.graph_name()
    }

    /// Settings configured for this graph
    pub fn default_settings(&self) -> PathFinderSettings {
        self.inner.defaults
    }

    async fn store(&self) -> AssocResult<&GraphHandle> {
        self.inner.session.open().await
    }

    /// Every simple path of `1..=max_distance` edges between two nodes
    ///
    /// Unknown nodes and unconnected pairs give an empty result.
    pub async fn find_paths(
        &self,
        start: NodeId,
        target: NodeId,
        settings: PathFinderSettings,
    ) -> AssocResult<PathResult> {
        if !settings.use_cache {
            return self.compute_paths(start, target, settings.max_distance).await;
        }

        let key = CacheKey::Paths {
            graph: self.graph_name().to_string(),
            start,
            target,
            max_distance: settings.max_distance,
        };
        self.inner
            .cache
            .get_monitored(self.graph_name(), key, || {
                self.compute_paths(start, target, settings.max_distance)
            })
            .await
    }

    async fn compute_paths(&self, start: NodeId, target: NodeId, max_distance: usize) -> AssocResult<PathResult> {
        let store = self.store().await?;

        let Some(start_ref) = store.index.lookup(start).await? else {
            return Ok(PathResult::default());
        };
        let Some(target_ref) = store.index.lookup(target).await? else {
            return Ok(PathResult::default());
        };

        let mut query = PathQuery::new(start_ref, target_ref, max_distance);
        query.edge_type = self.inner.edge_type.clone();

        let paths: Vec<Vec<NodeId>> = store
            .client
            .bounded_paths(&query)
            .await?
            .into_iter()
            .map(RawPath::into_node_ids)
            .collect();

        debug!(
            "Found {} paths between {} and {} in graph {}",
            paths.len(),
            start,
            target,
            self.graph_name()
        );
        Ok(PathResult::from_paths(paths))
    }

    /// Lazily computed neighbourhood of `center`, paged at the connection level
    pub fn get_partial_graph(
        &self,
        center: NodeId,
        settings: PathFinderSettings,
        paging: Paging,
    ) -> QueryableGraph {
        QueryableGraph::new(self.clone(), center, settings, paging)
    }

    async fn compute_neighbourhood(&self, center: NodeId, max_distance: usize, paging: Paging) -> AssocResult<PathGraph> {
        let store = self.store().await?;

        let Some(center_ref) = store.index.lookup(center).await? else {
            return Ok(PathGraph::new());
        };

        let connections = store
            .client
            .neighbourhood(center_ref, &self.inner.edge_type, max_distance, paging)
            .await?;

        debug!(
            "Neighbourhood of {} in graph {} has {} connections",
            center,
            self.graph_name(),
            connections.len()
        );
        Ok(PathGraph::from_connections(connections))
    }

    fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }
}
