//! The healing controller: generate, normalize, execute, retry once.

use askcypher_core::QueryResult;
use askcypher_graph::{CypherExecutor, GraphError, IntrospectionError, SchemaSnapshot};
use askcypher_llm::{GenerationError, QueryGenerator};

use crate::normalize::normalize;
use crate::prompt::{build_conversation, PriorExchange};

/// Attempt ceiling per question: the initial attempt plus one healing
/// retry. Not configurable; a second rejection means giving up.
const MAX_ATTEMPTS: u32 = 2;

/// Errors that surface to the caller unhandled.
///
/// `GraphError::Syntax` never appears here: the healing loop consumes it
/// and, once the budget is spent, reports `Answer::InvalidCypher` instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Query execution failed: {0}")]
    Execution(GraphError),
}

/// Outcome of one `answer` call.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Answer {
    /// The generated query executed; here is its tabular result.
    Rows(QueryResult),
    /// Two generations in a row were rejected by the parser.
    InvalidCypher,
}

impl Answer {
    /// Caller-facing sentinel string for the failure case, distinguishable
    /// from any (possibly empty) result set.
    pub const INVALID_CYPHER: &'static str = "Invalid Cypher syntax";
}

/// One question-answering session against a single database.
///
/// Owns the schema snapshot that grounds every prompt. Strictly
/// sequential: each `answer` call runs its network round-trips one after
/// another, and nothing here is safe to share across concurrent callers.
pub struct CypherSession<G, X> {
    generator: G,
    executor: X,
    schema: SchemaSnapshot,
}

impl<G, X> CypherSession<G, X>
where
    G: QueryGenerator,
    X: CypherExecutor,
{
    /// Introspect the schema and construct the session.
    ///
    /// Introspection failure is fatal here: without a snapshot there is
    /// nothing to ground generation on, so no session is returned.
    pub async fn bootstrap(generator: G, executor: X) -> Result<Self, SessionError> {
        let schema = executor.introspect().await?;
        Ok(Self {
            generator,
            executor,
            schema,
        })
    }

    /// Re-introspect and replace the snapshot wholesale.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn refresh_schema(&mut self) -> Result<(), SessionError> {
        self.schema = self.executor.introspect().await?;
        Ok(())
    }

    /// The snapshot currently grounding generation.
    pub fn schema(&self) -> &SchemaSnapshot {
        &self.schema
    }

    /// Answer a natural-language question with a Cypher query result.
    ///
    /// Generate, normalize, execute. A parser rejection feeds the failed
    /// query and its error back into the prompt for exactly one
    /// regeneration; a second rejection yields `Answer::InvalidCypher`.
    /// Every other failure propagates immediately: only a syntax message
    /// is informative enough for the generator to act on.
    pub async fn answer(&self, question: &str) -> Result<Answer, SessionError> {
        let schema_text = self.schema.render();
        let mut prior: Option<PriorExchange> = None;

        for attempt in 0..MAX_ATTEMPTS {
            let conversation = build_conversation(&schema_text, question, prior.as_ref());
            let raw = self.generator.generate(&conversation).await?;
            let cypher = normalize(&raw);
            tracing::debug!(attempt, query = %cypher, "Executing generated Cypher");

            match self.executor.run_cypher(&cypher).await {
                Ok(result) => return Ok(Answer::Rows(result)),
                Err(GraphError::Syntax(message)) => {
                    tracing::warn!(attempt, error = %message, "Generated query rejected by parser");
                    prior = Some(PriorExchange {
                        failed_query: cypher,
                        error_message: message,
                    });
                }
                Err(other) => return Err(SessionError::Execution(other)),
            }
        }

        tracing::warn!(question, "Healing budget exhausted, giving up");
        Ok(Answer::InvalidCypher)
    }
}
