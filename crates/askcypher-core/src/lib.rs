//! askcypher-core: Shared types and configuration for askcypher.
//!
//! This crate provides the foundational pieces used across the workspace:
//! - Conversation types (role-tagged turns) sent to the completion service
//! - QueryResult (column header + row values) returned from Cypher execution
//! - Layered configuration loading

pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::{Conversation, ConversationTurn, QueryResult, Role};
