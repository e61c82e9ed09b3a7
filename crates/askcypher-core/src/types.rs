//! Conversation and result types shared across the askcypher crates.

use serde::{Deserialize, Serialize};

/// Speaker role for one completion-service turn.
///
/// Serializes lowercase, matching the chat API wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message in a completion-service conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered turns for one question-answering attempt.
///
/// Turns are only ever appended; a healing retry rebuilds the whole
/// conversation rather than growing the previous one.
pub type Conversation = Vec<ConversationTurn>;

/// Tabular result of one Cypher execution.
///
/// `columns` carries the record keys in the order the server reported
/// them; each row's values line up positionally with `columns`. Produced
/// fresh per execution, never cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_turn_constructors() {
        let turn = ConversationTurn::user("how many nodes are there?");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "how many nodes are there?");
    }

    #[test]
    fn test_empty_result() {
        let result = QueryResult::default();
        assert!(result.is_empty());
        assert!(result.columns.is_empty());
    }
}
