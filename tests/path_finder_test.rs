mod common;

use assocgraph::{NodeId, Paging, PathFinderSettings};
use common::NotionGraph;

fn settings() -> PathFinderSettings {
    PathFinderSettings::default()
}

#[tokio::test]
async fn test_single_paths_are_found() {
    let graph = NotionGraph::build().await;
    let finder = &graph.services.path_finder;

    let result = finder
        .find_paths(graph.id("medicine"), graph.id("colour"), settings())
        .await
        .unwrap();

    let right_path = graph.path(&["medicine", "cyanide", "cyan", "colour"]);
    assert_eq!(result.succeeded_paths, vec![right_path.clone()]);
    assert_eq!(result.succeeded_graph.node_count(), 4);
    assert_eq!(result.succeeded_graph.edge_count(), 3);
    assert!(result.succeeded_graph.contains_path(&right_path));
}

#[tokio::test]
async fn test_single_paths_are_found_across_people() {
    let graph = NotionGraph::build().await;
    let finder = &graph.services.path_finder;

    let result = finder
        .find_paths(graph.id("American"), graph.id("writer"), settings())
        .await
        .unwrap();

    let right_path = graph.path(&["American", "Ernest Hemingway", "writer"]);
    assert_eq!(result.succeeded_paths, vec![right_path.clone()]);
    assert_eq!(result.succeeded_graph.node_count(), 3);
    assert_eq!(result.succeeded_graph.edge_count(), 2);
    assert!(result.succeeded_graph.contains_path(&right_path));
}

#[tokio::test]
async fn test_dual_paths_are_found() {
    let graph = NotionGraph::build().await;
    let finder = &graph.services.path_finder;

    let result = finder
        .find_paths(graph.id("yellow"), graph.id("light year"), settings())
        .await
        .unwrap();

    let right_path1 = graph.path(&["yellow", "sun", "light", "light year"]);
    let right_path2 = graph.path(&["yellow", "colour", "light", "light year"]);

    assert_eq!(result.succeeded_graph.node_count(), 5);
    assert_eq!(result.succeeded_graph.edge_count(), 5);
    assert!(result.succeeded_graph.contains_path(&right_path1));
    assert!(result.succeeded_graph.contains_path(&right_path2));

    // The order of found paths is not fixed
    assert_eq!(result.succeeded_paths.len(), 2);
    for path in &result.succeeded_paths {
        assert!(*path == right_path1 || *path == right_path2);
    }
}

#[tokio::test]
async fn test_too_long_paths_are_not_found() {
    let graph = NotionGraph::build().await;
    let finder = &graph.services.path_finder;

    let result = finder
        .find_paths(graph.id("blue"), graph.id("medicine"), settings())
        .await
        .unwrap();

    assert!(result.succeeded_paths.is_empty());
    assert_eq!(result.succeeded_graph.node_count(), 0);
    assert_eq!(result.succeeded_graph.edge_count(), 0);
}

#[tokio::test]
async fn test_not_connected_paths_are_not_found() {
    let graph = NotionGraph::build().await;
    let finder = &graph.services.path_finder;

    let result = finder
        .find_paths(graph.id("writer"), graph.id("plant"), settings())
        .await
        .unwrap();

    assert!(result.succeeded_paths.is_empty());
    assert!(result.succeeded_graph.is_empty());
}

#[tokio::test]
async fn test_paths_have_no_repeated_nodes() {
    let graph = NotionGraph::build().await;
    let finder = &graph.services.path_finder;

    let result = finder
        .find_paths(graph.id("cyan"), graph.id("sky"), PathFinderSettings::uncached(6))
        .await
        .unwrap();

    assert!(!result.succeeded_paths.is_empty());
    for path in &result.succeeded_paths {
        assert!(path.len() - 1 <= 6);
        assert_eq!(path.first(), Some(&graph.id("cyan")));
        assert_eq!(path.last(), Some(&graph.id("sky")));
        let mut unique = path.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), path.len());
    }
}

#[tokio::test]
async fn test_larger_distance_finds_longer_paths() {
    let graph = NotionGraph::build().await;
    let finder = &graph.services.path_finder;

    let near = finder
        .find_paths(graph.id("blue"), graph.id("light"), PathFinderSettings::uncached(2))
        .await
        .unwrap();
    assert!(near.is_empty());

    let far = finder
        .find_paths(graph.id("blue"), graph.id("light"), PathFinderSettings::uncached(3))
        .await
        .unwrap();
    assert_eq!(far.succeeded_paths, vec![graph.path(&["blue", "sky", "sun", "light"])]);
}

#[tokio::test]
async fn test_partial_graph_around_a_node() {
    let graph = NotionGraph::build().await;
    let finder = &graph.services.path_finder;

    let partial = finder.get_partial_graph(graph.id("light"), PathFinderSettings::new(1, true), Paging::all());
    let subgraph = partial.to_graph().await.unwrap();

    assert_eq!(subgraph.edge_count(), 3);
    assert_eq!(subgraph.node_count(), 4);
    for name in ["sun", "light year", "colour"] {
        assert!(subgraph.contains_connection(graph.id("light"), graph.id(name)));
    }

    let wider = finder
        .get_partial_graph(graph.id("light"), PathFinderSettings::new(2, true), Paging::all())
        .to_graph()
        .await
        .unwrap();
    // light's neighbours bring in their own connections
    assert!(wider.contains_connection(graph.id("sun"), graph.id("sky")));
    assert!(wider.contains_connection(graph.id("colour"), graph.id("cyan")));
    assert!(!wider.contains_node(graph.id("blue")));
    assert!(!wider.contains_node(graph.id("medicine")));
}

#[tokio::test]
async fn test_partial_graph_paging() {
    let graph = NotionGraph::build().await;
    let finder = &graph.services.path_finder;
    let light = graph.id("light");
    let settings = PathFinderSettings::new(2, true);

    let whole = finder.get_partial_graph(light, settings, Paging::all()).to_graph().await.unwrap();
    let first = finder
        .get_partial_graph(light, settings, Paging::new(0, Some(3)))
        .to_graph()
        .await
        .unwrap();
    let second = finder
        .get_partial_graph(light, settings, Paging::new(3, None))
        .to_graph()
        .await
        .unwrap();

    assert_eq!(first.edge_count(), 3);
    assert_eq!(first.edge_count() + second.edge_count(), whole.edge_count());
    for connection in first.connections().chain(second.connections()) {
        assert!(whole.contains_connection(connection.node1, connection.node2));
    }

    // A view pages the base graph's connections
    let view = finder
        .get_partial_graph(light, settings, Paging::all())
        .page(0, Some(3))
        .to_graph()
        .await
        .unwrap();
    assert_eq!(view, first);

    let nested = finder
        .get_partial_graph(light, settings, Paging::all())
        .page(1, Some(4))
        .page(1, None);
    assert_eq!(nested.view(), Paging::new(2, Some(3)));
    assert_eq!(nested.edge_count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_partial_graph_of_unknown_node_is_empty() {
    let graph = NotionGraph::build().await;
    let subgraph = graph
        .services
        .path_finder
        .get_partial_graph(NodeId(999), PathFinderSettings::default(), Paging::all())
        .to_graph()
        .await
        .unwrap();
    assert!(subgraph.is_empty());
}

#[tokio::test]
async fn test_partial_graph_is_lazy() {
    let graph = NotionGraph::build().await;
    let before = graph.client.traversal_query_count();

    let partial = graph
        .services
        .path_finder
        .get_partial_graph(graph.id("sun"), PathFinderSettings::default(), Paging::all());
    assert_eq!(graph.client.traversal_query_count(), before);

    partial.to_graph().await.unwrap();
    assert_eq!(graph.client.traversal_query_count(), before + 1);
}

#[tokio::test]
async fn test_zero_distance_finds_nothing() {
    let graph = NotionGraph::build().await;
    let result = graph
        .services
        .path_finder
        .find_paths(graph.id("sun"), graph.id("light"), PathFinderSettings::new(0, true))
        .await
        .unwrap();
    assert!(result.is_empty());
}
