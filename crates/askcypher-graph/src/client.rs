//! Neo4j connection management and Cypher execution.

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Query};

use askcypher_core::QueryResult;

use crate::introspect::{IntrospectionError, SchemaSnapshot};

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    /// The server's parser rejected the statement. The message carries
    /// enough detail to feed back to the generator, so this is the one
    /// variant the healing loop acts on.
    #[error("Cypher syntax error: {0}")]
    Syntax(String),

    #[error("Query execution error: {0}")]
    Execution(String),

    #[error("Result deserialization error: {0}")]
    Deserialization(String),
}

/// Configuration for connecting to Neo4j.
///
/// Encryption with full certificate trust is selected through the URI
/// scheme (`neo4j+ssc://` / `bolt+ssc://`), matching the deployments this
/// tool targets.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "neo4j+ssc://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            max_connections: 16,
            fetch_size: 256,
        }
    }
}

/// Thread-safe Neo4j client with connection pooling.
///
/// Clone is cheap (inner Arc). A session shares one of these; nothing
/// here serializes concurrent callers.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Run a Cypher statement and collect its tabular result.
    ///
    /// No read-only restriction is imposed: a write statement will run
    /// and mutate the database.
    pub async fn run_cypher(&self, cypher: &str) -> Result<QueryResult, GraphError> {
        self.run_cypher_with_params(cypher, &[]).await
    }

    /// Run a Cypher statement with named parameters.
    ///
    /// Column names come from the record keys in their reported order;
    /// rows line up positionally with them.
    pub async fn run_cypher_with_params(
        &self,
        cypher: &str,
        params: &[(&str, serde_json::Value)],
    ) -> Result<QueryResult, GraphError> {
        let mut q = query(cypher);
        for (name, value) in params {
            q = bind_param(q, name, value);
        }

        let mut stream = self.graph.execute(q).await.map_err(classify)?;
        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::new();

        loop {
            let row = match stream.next().await {
                Ok(Some(row)) => row,
                Ok(None) => break,
                Err(e) => return Err(classify(e)),
            };
            let record = row
                .to::<serde_json::Map<String, serde_json::Value>>()
                .map_err(|e| GraphError::Deserialization(e.to_string()))?;
            if columns.is_empty() {
                columns = record.keys().cloned().collect();
            }
            rows.push(record.into_iter().map(|(_, v)| v).collect());
        }

        Ok(QueryResult { columns, rows })
    }
}

/// Map a neo4rs error onto the taxonomy. Only server-side parser
/// rejections become `Syntax`; everything else is `Execution`.
fn classify(err: neo4rs::Error) -> GraphError {
    match err {
        neo4rs::Error::Neo4j(e) if is_syntax_code(e.code()) => {
            GraphError::Syntax(e.message().to_string())
        }
        other => GraphError::Execution(other.to_string()),
    }
}

/// Neo4j status codes look like `Neo.ClientError.Statement.SyntaxError`.
fn is_syntax_code(code: &str) -> bool {
    code.ends_with(".SyntaxError")
}

fn bind_param(q: Query, name: &str, value: &serde_json::Value) -> Query {
    use serde_json::Value;
    match value {
        Value::Bool(b) => q.param(name, *b),
        Value::Number(n) if n.is_i64() => q.param(name, n.as_i64().unwrap_or_default()),
        Value::Number(n) => q.param(name, n.as_f64().unwrap_or_default()),
        Value::String(s) => q.param(name, s.clone()),
        // Lists, maps and nulls are passed through as their JSON text;
        // generated queries carry no parameters in practice.
        other => q.param(name, other.to_string()),
    }
}

/// Seam between the healing controller and the database.
///
/// `GraphClient` is the production implementation; tests substitute
/// scripted mocks to drive the retry state machine without a server.
#[async_trait]
pub trait CypherExecutor: Send + Sync {
    /// Execute one Cypher statement, classifying parser rejections as
    /// `GraphError::Syntax`.
    async fn run_cypher(&self, cypher: &str) -> Result<QueryResult, GraphError>;

    /// Build a fresh schema snapshot from database metadata.
    async fn introspect(&self) -> Result<SchemaSnapshot, IntrospectionError>;
}

#[async_trait]
impl CypherExecutor for GraphClient {
    async fn run_cypher(&self, cypher: &str) -> Result<QueryResult, GraphError> {
        GraphClient::run_cypher(self, cypher).await
    }

    async fn introspect(&self) -> Result<SchemaSnapshot, IntrospectionError> {
        crate::introspect::introspect(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_code_detection() {
        assert!(is_syntax_code("Neo.ClientError.Statement.SyntaxError"));
        assert!(!is_syntax_code("Neo.ClientError.Statement.TypeError"));
        assert!(!is_syntax_code("Neo.ClientError.Security.Unauthorized"));
        assert!(!is_syntax_code(""));
    }
}
