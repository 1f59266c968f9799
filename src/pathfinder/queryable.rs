//! Lazily evaluated, pageable partial graph

use super::PathFinder;
use crate::cache::CacheKey;
use crate::config::PathFinderSettings;
use crate::error::AssocResult;
use crate::graph::{NodeId, Paging, PathGraph};

/// Window `inner` taken inside window `outer`
fn compose(outer: Paging, inner: Paging) -> Paging {
    let remaining = outer.take.map(|take| take.saturating_sub(inner.skip));
    let take = match (remaining, inner.take) {
        (Some(remaining), Some(take)) => Some(remaining.min(take)),
        (Some(remaining), None) => Some(remaining),
        (None, take) => take,
    };
    Paging::new(outer.skip + inner.skip, take)
}

/// Neighbourhood of a node, not computed until [`to_graph`](Self::to_graph)
///
/// The base graph is the paged list of connections around the center. Views
/// created with [`page`](Self::page) select a window of the base graph's
/// connections. Base graphs and views are cached under separate keys.
#[derive(Clone)]
pub struct QueryableGraph {
    finder: PathFinder,
    center: NodeId,
    settings: PathFinderSettings,
    paging: Paging,
    view: Paging,
}

impl QueryableGraph {
    pub(super) fn new(finder: PathFinder, center: NodeId, settings: PathFinderSettings, paging: Paging) -> Self {
        Self {
            finder,
            center,
            settings,
            paging,
            view: Paging::all(),
        }
    }

    pub fn center(&self) -> NodeId {
        self.center
    }

    /// Paging of the base graph
    pub fn paging(&self) -> Paging {
        self.paging
    }

    /// Window over the base graph's connections selected by this view
    pub fn view(&self) -> Paging {
        self.view
    }

    /// A further paged view; windows nest inside the current view
    pub fn page(&self, skip: usize, take: Option<usize>) -> QueryableGraph {
        QueryableGraph {
            view: compose(self.view, Paging::new(skip, take)),
            ..self.clone()
        }
    }

    fn graph_name(&self) -> &str {
        self.finder.graph_name()
    }

    async fn base_graph(&self) -> AssocResult<PathGraph> {
        let max_distance = self.settings.max_distance;
        if !self.settings.use_cache {
            return self
                .finder
                .compute_neighbourhood(self.center, max_distance, self.paging)
                .await;
        }

        let key = CacheKey::PartialBase {
            graph: self.graph_name().to_string(),
            center: self.center,
            max_distance,
            paging: self.paging,
        };
        self.finder
            .cache()
            .get_monitored(self.graph_name(), key, || {
                self.finder
                    .compute_neighbourhood(self.center, max_distance, self.paging)
            })
            .await
    }

    /// Evaluate the view
    pub async fn to_graph(&self) -> AssocResult<PathGraph> {
        let base = self.base_graph().await?;
        if self.view.is_unbounded() {
            return Ok(base);
        }
        if !self.settings.use_cache {
            return Ok(base.page(self.view));
        }

        let key = CacheKey::PartialView {
            graph: self.graph_name().to_string(),
            center: self.center,
            max_distance: self.settings.max_distance,
            base: self.paging,
            view: self.view,
        };
        let view = self.view;
        self.finder
            .cache()
            .get_monitored(self.graph_name(), key, || async move { Ok(base.page(view)) })
            .await
    }

    pub async fn node_count(&self) -> AssocResult<usize> {
        Ok(self.to_graph().await?.node_count())
    }

    pub async fn edge_count(&self) -> AssocResult<usize> {
        Ok(self.to_graph().await?.edge_count())
    }
}
