//! Shared notion graph used by the integration tests

#![allow(dead_code)]

use assocgraph::{GraphServices, GraphSettings, MemoryGraphClient, NodeId};
use std::collections::HashMap;
use std::sync::Arc;

pub const ASSOCIATIONS: &[(&str, &str)] = &[
    ("medicine", "cyanide"),
    ("cyanide", "cyan"),
    ("cyan", "colour"),
    ("yellow", "sun"),
    ("sun", "light"),
    ("light", "light year"),
    ("yellow", "colour"),
    ("colour", "light"),
    ("American", "Ernest Hemingway"),
    ("Ernest Hemingway", "writer"),
    ("blue", "sky"),
    ("sky", "sun"),
    ("plant", "tree"),
];

pub struct NotionGraph {
    pub services: GraphServices,
    pub client: Arc<MemoryGraphClient>,
    ids: HashMap<&'static str, NodeId>,
}

impl NotionGraph {
    pub fn empty() -> Self {
        let settings = GraphSettings::new("notions", "memory://notions");
        let (services, client) = GraphServices::in_memory(&settings);

        let mut ids = HashMap::new();
        for (a, b) in ASSOCIATIONS {
            for name in [*a, *b] {
                let next = NodeId::new(ids.len() as u64 + 1);
                ids.entry(name).or_insert(next);
            }
        }

        Self { services, client, ids }
    }

    pub async fn build() -> Self {
        let graph = Self::empty();
        for (a, b) in ASSOCIATIONS {
            graph
                .services
                .manager
                .connect(graph.id(a), graph.id(b))
                .await
                .unwrap();
        }
        graph
    }

    pub fn id(&self, name: &str) -> NodeId {
        self.ids[name]
    }

    pub fn path(&self, names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|name| self.id(name)).collect()
    }
}
