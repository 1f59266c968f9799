//! Assocgraph CLI: operator commands against a graph store
//!
//! Connects to the store over HTTP through a `GraphClientPool`. Graph info and
//! statistics live in process memory, so counters shown by a command only
//! cover what that command did; `rebuild-stats` recomputes them from the store.

use anyhow::Context;
use assocgraph::{
    Connection, GraphClientPool, GraphEventBus, GraphServices, GraphSettings, NodeId, Paging,
    PathFinderSettings, PathGraph,
};
use assocgraph::stats::{MemoryGraphInfoRepository, MemoryGraphStatistics};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "assocgraph", version, about = "Association graph CLI")]
struct Cli {
    /// Root URI of the graph store
    #[arg(long, default_value = "http://localhost:7474/db/data/", global = true, env = "ASSOCGRAPH_URL")]
    url: String,

    /// Graph name
    #[arg(long, default_value = "default", global = true)]
    graph: String,

    /// YAML settings file; overrides --url and --graph
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect two nodes
    Connect { node1: u64, node2: u64 },
    /// Remove the connection between two nodes
    Disconnect { node1: u64, node2: u64 },
    /// Delete a node and all of its connections
    DeleteNode { node: u64 },
    /// List the neighbours of a node
    Neighbours {
        node: u64,
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long)]
        take: Option<usize>,
    },
    /// List every connection of the graph
    Connections {
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long)]
        take: Option<usize>,
    },
    /// Find the paths between two nodes
    Paths {
        start: u64,
        target: u64,
        #[arg(long)]
        max_distance: Option<usize>,
    },
    /// Show the neighbourhood of a node
    Partial {
        center: u64,
        #[arg(long)]
        max_distance: Option<usize>,
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long)]
        take: Option<usize>,
    },
    /// Recompute node count, connection count and the biggest node
    RebuildStats,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn settings(cli: &Cli) -> anyhow::Result<GraphSettings> {
    match &cli.config {
        Some(path) => GraphSettings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(GraphSettings::new(&cli.graph, &cli.url)),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = settings(&cli)?;
    let services = GraphServices::build(
        &settings,
        Arc::new(GraphClientPool::http()),
        Arc::new(MemoryGraphInfoRepository::new()),
        Arc::new(MemoryGraphStatistics::new()),
        GraphEventBus::new(),
    );
    let manager = &services.manager;
    let finder_settings = |max_distance: Option<usize>| {
        let defaults = services.path_finder.default_settings();
        PathFinderSettings::new(max_distance.unwrap_or(defaults.max_distance), false)
    };

    match cli.command {
        Commands::Connect { node1, node2 } => {
            manager.connect(NodeId(node1), NodeId(node2)).await?;
            report_mutation(format!("Connected {} and {}", node1, node2));
        }
        Commands::Disconnect { node1, node2 } => {
            manager.disconnect(NodeId(node1), NodeId(node2)).await?;
            report_mutation(format!("Disconnected {} and {}", node1, node2));
        }
        Commands::DeleteNode { node } => {
            manager.delete_from_node(NodeId(node)).await?;
            report_mutation(format!("Deleted {}", node));
        }
        Commands::Neighbours { node, skip, take } => {
            let neighbours = manager.get_neighbour_ids(NodeId(node), Paging::new(skip, take)).await?;
            let count = manager.get_neighbour_count(NodeId(node)).await?;
            print_ids(&neighbours, &cli.format)?;
            if matches!(cli.format, OutputFormat::Table) {
                println!("{} neighbour(s) in total", count);
            }
        }
        Commands::Connections { skip, take } => {
            let connections = manager.get_all(Paging::new(skip, take)).await?;
            print_connections(&connections, &cli.format)?;
        }
        Commands::Paths { start, target, max_distance } => {
            let result = services
                .path_finder
                .find_paths(NodeId(start), NodeId(target), finder_settings(max_distance))
                .await?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Csv => {
                    for path in &result.succeeded_paths {
                        let cells: Vec<String> = path.iter().map(|id| id.to_string()).collect();
                        println!("{}", cells.join(","));
                    }
                }
                OutputFormat::Table => {
                    let mut table = Table::new();
                    table.set_content_arrangement(ContentArrangement::Dynamic);
                    table.set_header(vec!["#", "path"]);
                    for (i, path) in result.succeeded_paths.iter().enumerate() {
                        let cells: Vec<String> = path.iter().map(|id| id.to_string()).collect();
                        table.add_row(vec![(i + 1).to_string(), cells.join(" -> ")]);
                    }
                    println!("{}", table);
                    println!("{} path(s)", result.succeeded_paths.len());
                }
            }
        }
        Commands::Partial { center, max_distance, skip, take } => {
            let graph = services
                .path_finder
                .get_partial_graph(NodeId(center), finder_settings(max_distance), Paging::new(skip, take))
                .to_graph()
                .await?;
            print_graph(&graph, &cli.format)?;
        }
        Commands::RebuildStats => {
            let snapshot = manager
                .spawn_rebuild_statistics()
                .await
                .context("statistics rebuild task failed")??;
            let info = manager.biggest_node().await?;

            match cli.format {
                OutputFormat::Json => {
                    let value = serde_json::json!({ "statistics": snapshot, "biggest_node": info });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                _ => {
                    println!("Nodes:        {}", snapshot.node_count);
                    println!("Connections:  {}", snapshot.connection_count);
                    match info.biggest_node_id {
                        Some(id) => println!("Biggest node: {} ({} neighbours)", id, info.biggest_node_neighbour_count),
                        None => println!("Biggest node: none"),
                    }
                }
            }
        }
    }

    Ok(())
}

/// Graph info and statistics of a CLI run live only as long as the process
const UNPERSISTED_STATISTICS: &str =
    "note: node counts and the biggest node are not kept between runs; run `rebuild-stats` to recompute them from the store";

fn report_mutation(summary: String) {
    println!("{}", summary);
    eprintln!("{}", UNPERSISTED_STATISTICS);
}

fn print_ids(ids: &[NodeId], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(ids)?),
        OutputFormat::Csv => {
            for id in ids {
                println!("{}", id);
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec!["neighbour"]);
            for id in ids {
                table.add_row(vec![id.to_string()]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn print_connections(connections: &[Connection], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(connections)?),
        OutputFormat::Csv => {
            println!("node1,node2");
            for connection in connections {
                println!("{},{}", connection.node1, connection.node2);
            }
        }
        OutputFormat::Table => {
            if connections.is_empty() {
                println!("(no connections)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["node1", "node2"]);
            for connection in connections {
                table.add_row(vec![connection.node1.to_string(), connection.node2.to_string()]);
            }
            println!("{}", table);
            println!("{} connection(s)", connections.len());
        }
    }
    Ok(())
}

fn print_graph(graph: &PathGraph, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(graph)?),
        _ => {
            let connections: Vec<Connection> = graph.connections().collect();
            print_connections(&connections, format)?;
            if matches!(format, OutputFormat::Table) {
                println!("{} node(s)", graph.node_count());
            }
        }
    }
    Ok(())
}
