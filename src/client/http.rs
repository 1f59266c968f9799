//! HttpGraphClient: network client for a Neo4j-compatible graph store
//!
//! Every operation is one parameterised Cypher statement posted to the
//! transactional endpoint `<root>/transaction/commit`.

use super::{parse_id_query, ClientError, ClientResult, GraphClient, IndexedNode, NodeDegree, PathNode, PathQuery, RawPath};
use crate::graph::{Connection, DeleteMode, EdgeRef, EdgeType, IndexFor, NodeId, NodeRef, Paging};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<StatementError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct StatementError {
    code: String,
    message: String,
}

/// Backtick-quote a label, relationship type or index name
fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn paging_clause(paging: Paging) -> String {
    match paging.take {
        Some(take) => format!(" SKIP {} LIMIT {}", paging.skip, take),
        None => format!(" SKIP {}", paging.skip),
    }
}

fn index_name(name: &str) -> String {
    format!("{}_id", name)
}

fn decode<T: DeserializeOwned>(value: Value) -> ClientResult<T> {
    Ok(serde_json::from_value(value)?)
}

/// First column of the first row
fn scalar<T: DeserializeOwned>(rows: Vec<Vec<Value>>) -> ClientResult<Option<T>> {
    match rows.into_iter().next().and_then(|row| row.into_iter().next()) {
        Some(value) => decode(value).map(Some),
        None => Ok(None),
    }
}

/// Network client that talks to a running graph store.
pub struct HttpGraphClient {
    root_uri: String,
    http_client: Client,
    reserved_nodes: u64,
}

impl HttpGraphClient {
    /// Create a client for the store rooted at `root_uri`.
    ///
    /// # Example
    /// ```no_run
    /// # use assocgraph::client::HttpGraphClient;
    /// let client = HttpGraphClient::new("http://localhost:7474/db/data/");
    /// ```
    pub fn new(root_uri: &str) -> Self {
        Self {
            root_uri: root_uri.trim_end_matches('/').to_string(),
            http_client: Client::new(),
            reserved_nodes: 0,
        }
    }

    /// Number of store-owned nodes (such as a reference node) counted by `node_count`
    pub fn with_reserved_nodes(mut self, reserved_nodes: u64) -> Self {
        self.reserved_nodes = reserved_nodes;
        self
    }

    pub fn root_uri(&self) -> &str {
        &self.root_uri
    }

    /// Run one statement and return its rows
    async fn run(&self, statement: &str, parameters: Value) -> ClientResult<Vec<Vec<Value>>> {
        let url = format!("{}/transaction/commit", self.root_uri);
        let body = json!({
            "statements": [{
                "statement": statement,
                "parameters": parameters,
                "resultDataContents": ["row"],
            }]
        });

        debug!("Cypher: {}", statement);

        let response = self.http_client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Query(format!(
                "Transaction endpoint returned {}",
                response.status()
            )));
        }

        let response: CommitResponse = response.json().await?;
        if let Some(error) = response.errors.into_iter().next() {
            return Err(ClientError::Query(format!("{}: {}", error.code, error.message)));
        }

        Ok(response
            .results
            .into_iter()
            .next()
            .map(|result| result.data.into_iter().map(|data| data.row).collect())
            .unwrap_or_default())
    }

    async fn count(&self, statement: &str, parameters: Value) -> ClientResult<u64> {
        Ok(scalar(self.run(statement, parameters).await?)?.unwrap_or(0))
    }
}

#[async_trait]
impl GraphClient for HttpGraphClient {
    async fn ping(&self) -> ClientResult<()> {
        self.run("RETURN 1", json!({}))
            .await
            .map(|_| ())
            .map_err(|e| ClientError::Connection(format!("{} is not reachable: {}", self.root_uri, e)))
    }

    async fn create_indexed_node(&self, index: &str, id: NodeId) -> ClientResult<NodeRef> {
        let statement = format!("CREATE (n:{} {{id: $id}}) RETURN id(n)", quote_identifier(index));
        let rows = self.run(&statement, json!({ "id": id })).await?;
        scalar(rows)?
            .map(NodeRef)
            .ok_or_else(|| ClientError::Query(format!("Creating node {} returned no reference", id)))
    }

    async fn delete_node(&self, node: NodeRef, mode: DeleteMode) -> ClientResult<()> {
        let statement = match mode {
            DeleteMode::NodeOnly => "MATCH (n) WHERE id(n) = $ref DELETE n",
            DeleteMode::NodeAndEdges => "MATCH (n) WHERE id(n) = $ref DETACH DELETE n",
        };
        self.run(statement, json!({ "ref": node })).await?;
        Ok(())
    }

    async fn create_edge(&self, from: NodeRef, to: NodeRef, edge_type: &EdgeType) -> ClientResult<EdgeRef> {
        let statement = format!(
            "MATCH (a), (b) WHERE id(a) = $from AND id(b) = $to CREATE (a)-[r:{}]->(b) RETURN id(r)",
            quote_identifier(edge_type.as_str())
        );
        let rows = self.run(&statement, json!({ "from": from, "to": to })).await?;
        scalar(rows)?
            .map(EdgeRef)
            .ok_or_else(|| ClientError::Query(format!("Nodes {} and {} do not exist", from, to)))
    }

    async fn delete_edge(&self, edge: EdgeRef) -> ClientResult<()> {
        self.run("MATCH ()-[r]->() WHERE id(r) = $ref DELETE r", json!({ "ref": edge }))
            .await?;
        Ok(())
    }

    async fn create_exact_match_index(&self, name: &str, kind: IndexFor) -> ClientResult<()> {
        let statement = match kind {
            IndexFor::Node => format!(
                "CREATE INDEX {} IF NOT EXISTS FOR (n:{}) ON (n.id)",
                quote_identifier(&index_name(name)),
                quote_identifier(name)
            ),
            IndexFor::Relationship => format!(
                "CREATE INDEX {} IF NOT EXISTS FOR ()-[r:{}]-() ON (r.id)",
                quote_identifier(&index_name(name)),
                quote_identifier(name)
            ),
        };
        self.run(&statement, json!({})).await?;
        Ok(())
    }

    async fn index_exists(&self, name: &str, _kind: IndexFor) -> ClientResult<bool> {
        let found = self
            .count(
                "SHOW INDEXES YIELD name WHERE name = $name RETURN count(*)",
                json!({ "name": index_name(name) }),
            )
            .await?;
        Ok(found > 0)
    }

    async fn query_index(&self, name: &str, kind: IndexFor, query: &str) -> ClientResult<Vec<IndexedNode>> {
        let id = parse_id_query(query)
            .ok_or_else(|| ClientError::Query(format!("Unsupported index query: {}", query)))?;

        let statement = match kind {
            IndexFor::Node => format!("MATCH (n:{} {{id: $id}}) RETURN id(n), n.id", quote_identifier(name)),
            IndexFor::Relationship => return Ok(Vec::new()),
        };

        self.run(&statement, json!({ "id": id }))
            .await?
            .into_iter()
            .map(|row| {
                let mut columns = row.into_iter();
                let reference = decode(columns.next().unwrap_or(Value::Null))?;
                let id = decode(columns.next().unwrap_or(Value::Null))?;
                Ok(IndexedNode { reference: NodeRef(reference), id: NodeId(id) })
            })
            .collect()
    }

    async fn edge_between(&self, node: NodeRef, other: NodeId, edge_type: &EdgeType) -> ClientResult<Option<EdgeRef>> {
        let statement = format!(
            "MATCH (a)-[r:{}]-(b {{id: $other}}) WHERE id(a) = $ref RETURN id(r) LIMIT 1",
            quote_identifier(edge_type.as_str())
        );
        let rows = self.run(&statement, json!({ "ref": node, "other": other })).await?;
        Ok(scalar(rows)?.map(EdgeRef))
    }

    async fn count_edges(&self, node: NodeRef, edge_type: &EdgeType) -> ClientResult<u64> {
        let statement = format!(
            "MATCH (a)-[r:{}]-() WHERE id(a) = $ref RETURN count(r)",
            quote_identifier(edge_type.as_str())
        );
        self.count(&statement, json!({ "ref": node })).await
    }

    async fn neighbour_ids(&self, node: NodeRef, edge_type: &EdgeType, paging: Paging) -> ClientResult<Vec<NodeId>> {
        let statement = format!(
            "MATCH (a)-[r:{}]-(b) WHERE id(a) = $ref RETURN b.id ORDER BY id(r){}",
            quote_identifier(edge_type.as_str()),
            paging_clause(paging)
        );
        self.run(&statement, json!({ "ref": node }))
            .await?
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .map(decode)
            .collect()
    }

    async fn connections(&self, edge_type: &EdgeType, paging: Paging) -> ClientResult<Vec<Connection>> {
        let statement = format!(
            "MATCH (a)-[r:{}]->(b) RETURN a.id, b.id ORDER BY id(r){}",
            quote_identifier(edge_type.as_str()),
            paging_clause(paging)
        );
        self.run(&statement, json!({}))
            .await?
            .into_iter()
            .map(|row| {
                let (a, b): (NodeId, NodeId) = decode(Value::Array(row))?;
                Ok(Connection::new(a, b))
            })
            .collect()
    }

    async fn node_count(&self) -> ClientResult<u64> {
        self.count("MATCH (n) RETURN count(n)", json!({})).await
    }

    async fn connection_count(&self, edge_type: &EdgeType) -> ClientResult<u64> {
        let statement = format!(
            "MATCH ()-[r:{}]->() RETURN count(r)",
            quote_identifier(edge_type.as_str())
        );
        self.count(&statement, json!({})).await
    }

    async fn biggest_node(&self, edge_type: &EdgeType) -> ClientResult<Option<NodeDegree>> {
        let statement = format!(
            "MATCH (n)-[r:{}]-() RETURN n.id AS id, count(r) AS degree ORDER BY degree DESC, id ASC LIMIT 1",
            quote_identifier(edge_type.as_str())
        );
        match self.run(&statement, json!({})).await?.into_iter().next() {
            Some(row) => {
                let (id, degree): (NodeId, u64) = decode(Value::Array(row))?;
                Ok(Some(NodeDegree { id, degree }))
            }
            None => Ok(None),
        }
    }

    async fn bounded_paths(&self, query: &PathQuery) -> ClientResult<Vec<RawPath>> {
        if query.max_depth == 0 || query.max_depth < query.min_depth {
            return Ok(Vec::new());
        }

        // Variable-length bounds cannot be parameters
        let statement = format!(
            "MATCH p = (a)-[:{}*{}..{}]-(b) WHERE id(a) = $start AND id(b) = $target \
             AND all(x IN nodes(p) WHERE single(y IN nodes(p) WHERE y = x)) \
             RETURN [x IN nodes(p) | {{id: x.id}}]",
            quote_identifier(query.edge_type.as_str()),
            query.min_depth,
            query.max_depth
        );
        self.run(&statement, json!({ "start": query.start, "target": query.target }))
            .await?
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .map(|value| {
                let nodes: Vec<PathNode> = decode(value)?;
                Ok(RawPath { nodes })
            })
            .collect()
    }

    async fn neighbourhood(
        &self,
        center: NodeRef,
        edge_type: &EdgeType,
        max_depth: usize,
        paging: Paging,
    ) -> ClientResult<Vec<Connection>> {
        if max_depth == 0 {
            return Ok(Vec::new());
        }

        let statement = format!(
            "MATCH p = (c)-[:{}*1..{}]-() WHERE id(c) = $center \
             UNWIND relationships(p) AS r \
             WITH DISTINCT startNode(r).id AS x, endNode(r).id AS y \
             WITH CASE WHEN x < y THEN x ELSE y END AS n1, CASE WHEN x < y THEN y ELSE x END AS n2 \
             RETURN DISTINCT n1, n2 ORDER BY n1, n2{}",
            quote_identifier(edge_type.as_str()),
            max_depth,
            paging_clause(paging)
        );
        self.run(&statement, json!({ "center": center }))
            .await?
            .into_iter()
            .map(|row| {
                let (a, b): (NodeId, NodeId) = decode(Value::Array(row))?;
                Ok(Connection::new(a, b))
            })
            .collect()
    }

    fn reserved_node_count(&self) -> u64 {
        self.reserved_nodes
    }
}
