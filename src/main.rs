use anyhow::Context;
use assocgraph::{
    GraphServices, GraphSettings, NodeId, Paging, PathFinderSettings, PathResult,
};
use std::collections::HashMap;

const NOTIONS: &[&str] = &[
    "medicine",
    "cyanide",
    "cyan",
    "colour",
    "yellow",
    "sun",
    "light",
    "light year",
    "American",
    "Ernest Hemingway",
    "writer",
    "blue",
    "sky",
    "plant",
    "tree",
];

const ASSOCIATIONS: &[(&str, &str)] = &[
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

struct Notions {
    ids: HashMap<&'static str, NodeId>,
    names: HashMap<NodeId, &'static str>,
}

impl Notions {
    fn new() -> Self {
        let mut ids = HashMap::new();
        let mut names = HashMap::new();
        for (i, name) in NOTIONS.iter().enumerate() {
            let id = NodeId::new(i as u64 + 1);
            ids.insert(*name, id);
            names.insert(id, *name);
        }
        Self { ids, names }
    }

    fn id(&self, name: &str) -> NodeId {
        self.ids[name]
    }

    fn name(&self, id: NodeId) -> &str {
        self.names.get(&id).copied().unwrap_or("?")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    run().await
}

async fn run() -> anyhow::Result<()> {
    println!("Assocgraph v{}", assocgraph::version());
    println!("==========================================");
    println!();

    let notions = Notions::new();
    let settings = GraphSettings::new("notions", "memory://notions");
    let (services, _store) = GraphServices::in_memory(&settings);

    println!("=== Building the notion graph ===");
    for (a, b) in ASSOCIATIONS {
        services
            .manager
            .connect(notions.id(a), notions.id(b))
            .await
            .with_context(|| format!("connecting {} and {}", a, b))?;
        println!("+ {} - {}", a, b);
    }

    let stats = services.manager.get_graph_info().await?;
    println!();
    println!(
        "{} nodes, {} connections, central node: {}",
        stats.node_count,
        stats.connection_count,
        stats.central_node_id.map(|id| notions.name(id)).unwrap_or("none")
    );

    println!();
    println!("=== Path discovery (max distance 3) ===");
    for (start, target) in [
        ("medicine", "colour"),
        ("American", "writer"),
        ("yellow", "light year"),
        ("blue", "medicine"),
        ("writer", "plant"),
    ] {
        let result = services
            .path_finder
            .find_paths(notions.id(start), notions.id(target), PathFinderSettings::default())
            .await
            .with_context(|| format!("finding paths from {} to {}", start, target))?;
        print_paths(&notions, start, target, &result);
    }

    println!();
    println!("=== Partial graph around \"light\" ===");
    let partial = services.path_finder.get_partial_graph(
        notions.id("light"),
        PathFinderSettings::new(1, true),
        Paging::all(),
    );
    let graph = partial
        .to_graph()
        .await
        .context("loading the partial graph around light")?;
    for connection in graph.connections() {
        println!(
            "  {} - {}",
            notions.name(connection.node1),
            notions.name(connection.node2)
        );
    }

    println!();
    println!("=== Disconnecting sun - light ===");
    services
        .manager
        .disconnect(notions.id("sun"), notions.id("light"))
        .await?;
    let result = services
        .path_finder
        .find_paths(notions.id("yellow"), notions.id("light year"), PathFinderSettings::default())
        .await?;
    print_paths(&notions, "yellow", "light year", &result);

    let stats = services
        .manager
        .rebuild_statistics()
        .await
        .context("rebuilding statistics")?;
    println!();
    println!(
        "Rebuilt statistics: {} nodes, {} connections",
        stats.node_count, stats.connection_count
    );

    Ok(())
}

fn print_paths(notions: &Notions, start: &str, target: &str, result: &PathResult) {
    println!(
        "{} -> {}: {} path(s), {} nodes / {} edges",
        start,
        target,
        result.succeeded_paths.len(),
        result.succeeded_graph.node_count(),
        result.succeeded_graph.edge_count()
    );
    for path in &result.succeeded_paths {
        let names: Vec<&str> = path.iter().map(|id| notions.name(*id)).collect();
        println!("    {}", names.join(" -> "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_association_names_a_notion() {
        let notions = Notions::new();
        for (a, b) in ASSOCIATIONS {
            assert_ne!(notions.id(a), notions.id(b));
        }
        assert_eq!(notions.name(NodeId::new(1)), "medicine");
    }

    #[tokio::test]
    async fn test_demo_runs_to_completion() {
        run().await.unwrap();
    }
}
