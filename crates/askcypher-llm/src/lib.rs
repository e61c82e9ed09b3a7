//! askcypher-llm: Azure OpenAI chat-completion client for askcypher.
//!
//! One operation: send a role-tagged conversation with deterministic
//! sampling and return the top completion's text. Authentication goes
//! through a bearer-token provider that is consulted on every call.

pub mod client;
pub mod token;

pub use client::{AzureChatClient, AzureChatConfig, GenerationError, QueryGenerator};
pub use token::{EnvTokenProvider, StaticTokenProvider, TokenProvider};
