//! Prompt construction for Cypher generation.

use askcypher_core::{Conversation, ConversationTurn};

/// The query and error carried from a failed attempt into the healing
/// retry. Exists only for the duration of one retry decision.
#[derive(Debug, Clone)]
pub struct PriorExchange {
    pub failed_query: String,
    pub error_message: String,
}

/// Fixed instructional preamble; the rendered schema goes below it.
const SYSTEM_PREAMBLE: &str = "\
Task: Generate Cypher queries to query a Neo4j graph database based on the provided schema definition.
Instructions:
Use only the provided relationship types and properties.
Do not use any other relationship types or properties that are not provided.
If you cannot generate a Cypher statement based on the provided schema, explain the reason to the user.";

const SYSTEM_CODA: &str =
    "Note: Do not include any explanations or apologies in your responses.";

/// Build the conversation for one generation attempt.
///
/// The system turn always comes first and embeds the full schema text.
/// A healing attempt appends the failed query verbatim as an assistant
/// turn plus a user turn carrying the error. The conversation is rebuilt
/// from scratch every attempt, so it never exceeds four turns.
pub fn build_conversation(
    schema_text: &str,
    question: &str,
    prior: Option<&PriorExchange>,
) -> Conversation {
    let system = format!("{SYSTEM_PREAMBLE}\nSchema:\n{schema_text}\n{SYSTEM_CODA}");
    let mut turns = vec![
        ConversationTurn::system(system),
        ConversationTurn::user(question),
    ];

    if let Some(prior) = prior {
        turns.push(ConversationTurn::assistant(prior.failed_query.clone()));
        turns.push(ConversationTurn::user(format!(
            "This query returns an error: {}\nGive me an improved query that works without any explanations or apologies",
            prior.error_message
        )));
    }

    turns
}
