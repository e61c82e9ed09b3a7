//! askcypher-cli: natural-language questions against a Neo4j graph.
//!
//! Composes the schema-grounded prompt, sends it to the completion
//! service, normalizes the generated Cypher, executes it, and on a
//! parser rejection feeds the error back to the generator exactly once.
//!
//! Generated queries run unrestricted: nothing stops the model from
//! producing a write statement, and this tool does not sandbox or reject
//! writes. Point it at a database you can afford to mutate.

pub mod normalize;
pub mod prompt;
pub mod session;

pub use session::{Answer, CypherSession, SessionError};
