//! askcypher-graph: Neo4j client and schema introspection for askcypher.
//!
//! All database access flows through this crate: ad-hoc Cypher execution
//! with tabular results, and the apoc.meta.data introspection that grounds
//! query generation in what the database actually contains.

pub mod client;
pub mod introspect;

pub use client::{CypherExecutor, GraphClient, GraphConfig, GraphError};
pub use introspect::{IntrospectionError, SchemaSnapshot};
