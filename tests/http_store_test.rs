use assocgraph::client::GraphClientPool;
use assocgraph::stats::{MemoryGraphInfoRepository, MemoryGraphStatistics};
use assocgraph::{
    AssocError, ClientError, GraphEventBus, GraphServices, GraphSettings, HttpGraphClient, NodeId,
    PathFinderSettings,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn services_for(server: &MockServer) -> GraphServices {
    let root = format!("{}/db/data/", server.uri());
    let settings = GraphSettings::new("notions", root.as_str());
    GraphServices::build(
        &settings,
        Arc::new(GraphClientPool::shared(Arc::new(HttpGraphClient::new(&root)))),
        Arc::new(MemoryGraphInfoRepository::new()),
        Arc::new(MemoryGraphStatistics::new()),
        GraphEventBus::new(),
    )
}

#[tokio::test]
async fn test_statement_errors_reach_the_manager_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/db/data/transaction/commit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "errors": [{"code": "Neo.DatabaseError.General.UnknownError", "message": "store offline"}]
        })))
        .mount(&server)
        .await;

    let services = services_for(&server).await;
    let err = services.manager.connect(NodeId(1), NodeId(2)).await.unwrap_err();

    match err {
        AssocError::Store(ClientError::Query(message)) => {
            assert_eq!(message, "Neo.DatabaseError.General.UnknownError: store offline");
        }
        other => panic!("expected the store error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_failures_reach_the_path_finder_as_store_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let services = services_for(&server).await;
    let err = services
        .path_finder
        .find_paths(NodeId(1), NodeId(2), PathFinderSettings::uncached(3))
        .await
        .unwrap_err();

    assert!(matches!(err, AssocError::Store(ClientError::Query(_))));
}
