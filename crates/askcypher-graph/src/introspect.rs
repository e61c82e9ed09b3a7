//! Schema introspection via `apoc.meta.data()`.
//!
//! Three read-only metadata queries are folded into a `SchemaSnapshot`
//! whose textual rendering grounds the completion prompt: the generator
//! only sees labels, properties and topology that actually exist.

use serde::Serialize;

use crate::client::{GraphClient, GraphError};

/// Node labels with aggregated property names.
const NODE_PROPERTIES_QUERY: &str = "
CALL apoc.meta.data()
YIELD label, other, elementType, type, property
WHERE NOT type = 'RELATIONSHIP' AND elementType = 'node'
WITH label AS label, collect(property) AS properties
RETURN label, properties
";

/// Relationship types with aggregated property names.
const REL_PROPERTIES_QUERY: &str = "
CALL apoc.meta.data()
YIELD label, other, elementType, type, property
WHERE NOT type = 'RELATIONSHIP' AND elementType = 'relationship'
WITH label AS rel_type, collect(property) AS properties
RETURN rel_type, properties
";

/// Endpoint topology: which labels each relationship type connects.
const TOPOLOGY_QUERY: &str = "
CALL apoc.meta.data()
YIELD label, other, elementType, type, property
WHERE type = 'RELATIONSHIP' AND elementType = 'node'
RETURN label AS source, property AS rel_type, other AS targets
";

/// A node label and the property names observed on it.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDescriptor {
    pub label: String,
    pub properties: Vec<String>,
}

/// A relationship type and the property names observed on it.
#[derive(Debug, Clone, Serialize)]
pub struct RelDescriptor {
    pub rel_type: String,
    pub properties: Vec<String>,
}

/// A directed `(source)-[rel_type]->(target)` triple.
#[derive(Debug, Clone, Serialize)]
pub struct TopologyTriple {
    pub source: String,
    pub rel_type: String,
    pub target: String,
}

/// Immutable snapshot of the database schema.
///
/// Built once at session bootstrap and replaced wholesale on refresh.
/// Ordering follows whatever the server returned; no client-side sorting
/// is imposed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaSnapshot {
    pub nodes: Vec<NodeDescriptor>,
    pub relationships: Vec<RelDescriptor>,
    pub topology: Vec<TopologyTriple>,
}

/// Schema introspection failed; there is nothing to ground generation on.
#[derive(Debug, thiserror::Error)]
#[error("schema introspection failed: {0}")]
pub struct IntrospectionError(#[from] pub GraphError);

impl SchemaSnapshot {
    /// Render the fixed-format schema text embedded in the system prompt.
    ///
    /// One line per label, relationship type, and topology triple. The
    /// closing note tells the generator that topology direction is
    /// authoritative and must not be inferred from traversal patterns.
    pub fn render(&self) -> String {
        let mut out = String::from(
            "This is the schema representation of the Neo4j database.\n\
             Node properties are the following:\n",
        );
        for node in &self.nodes {
            out.push_str(&format!(
                "{} {{{}}}\n",
                node.label,
                node.properties.join(", ")
            ));
        }
        out.push_str("Relationship properties are the following:\n");
        for rel in &self.relationships {
            out.push_str(&format!(
                "{} {{{}}}\n",
                rel.rel_type,
                rel.properties.join(", ")
            ));
        }
        out.push_str("Relationships point from source to target nodes:\n");
        for triple in &self.topology {
            out.push_str(&format!(
                "({})-[{}]->({})\n",
                triple.source, triple.rel_type, triple.target
            ));
        }
        out.push_str(
            "The direction in the topology list above is authoritative; \
             do not infer relationship direction from how relationships are traversed.\n",
        );
        out
    }
}

/// Build a fresh `SchemaSnapshot` from the three metadata queries.
///
/// Any failure aborts the whole build with no retry; callers keep their
/// previous snapshot (if any) on error.
pub async fn introspect(client: &GraphClient) -> Result<SchemaSnapshot, IntrospectionError> {
    let node_rows = client.run_cypher(NODE_PROPERTIES_QUERY).await?;
    let rel_rows = client.run_cypher(REL_PROPERTIES_QUERY).await?;
    let topo_rows = client.run_cypher(TOPOLOGY_QUERY).await?;

    let mut snapshot = SchemaSnapshot::default();

    for row in &node_rows.rows {
        snapshot.nodes.push(NodeDescriptor {
            label: string_at(row, 0),
            properties: strings_at(row, 1),
        });
    }

    for row in &rel_rows.rows {
        snapshot.relationships.push(RelDescriptor {
            rel_type: string_at(row, 0),
            properties: strings_at(row, 1),
        });
    }

    for row in &topo_rows.rows {
        let source = string_at(row, 0);
        let rel_type = string_at(row, 1);
        // `other` from apoc.meta.data is a list of target labels; emit
        // one triple per target.
        for target in strings_at(row, 2) {
            snapshot.topology.push(TopologyTriple {
                source: source.clone(),
                rel_type: rel_type.clone(),
                target,
            });
        }
    }

    tracing::debug!(
        nodes = snapshot.nodes.len(),
        relationships = snapshot.relationships.len(),
        topology = snapshot.topology.len(),
        "Introspected schema"
    );
    Ok(snapshot)
}

fn string_at(row: &[serde_json::Value], idx: usize) -> String {
    row.get(idx)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn strings_at(row: &[serde_json::Value], idx: usize) -> Vec<String> {
    row.get(idx)
        .and_then(|v| v.as_array())
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
