//! CLI entry point for askcypher.
//!
//! Wires the config-driven Neo4j client and Azure completion client into
//! a `CypherSession`, then answers one question (or dumps the schema)
//! and prints the result as JSON on stdout. Logs go to stderr.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use askcypher_cli::{Answer, CypherSession};
use askcypher_core::AppConfig;
use askcypher_graph::{GraphClient, GraphConfig};
use askcypher_llm::{
    AzureChatClient, AzureChatConfig, EnvTokenProvider, StaticTokenProvider, TokenProvider,
};

#[derive(Parser)]
#[command(name = "askcypher")]
#[command(about = "Ask a Neo4j database questions in plain language")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: askcypher).
    #[arg(short, long, default_value = "askcypher", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a question to Cypher, run it, and print the rows as JSON.
    Ask {
        /// The natural-language question.
        question: String,
    },
    /// Print the introspected schema exactly as the generator sees it.
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config);

    let graph = GraphClient::connect(&graph_config(&config)).await?;
    let generator = build_generator(&config);
    let session = CypherSession::bootstrap(generator, graph).await?;

    match cli.command {
        Command::Ask { ref question } => match session.answer(question).await? {
            Answer::Rows(result) => println!("{}", serde_json::to_string(&result)?),
            Answer::InvalidCypher => println!("{}", Answer::INVALID_CYPHER),
        },
        Command::Schema => print!("{}", session.schema().render()),
    }

    Ok(())
}

fn graph_config(config: &AppConfig) -> GraphConfig {
    GraphConfig {
        uri: config.neo4j.uri.clone(),
        user: config.neo4j.user.clone(),
        password: config.neo4j.password.clone(),
        database: config.neo4j.database.clone(),
        ..GraphConfig::default()
    }
}

fn build_generator(config: &AppConfig) -> AzureChatClient<Box<dyn TokenProvider>> {
    let tokens: Box<dyn TokenProvider> = match &config.azure.token {
        Some(token) => Box::new(StaticTokenProvider::new(token.clone())),
        None => Box::new(EnvTokenProvider::new("ASKCYPHER_TOKEN")),
    };
    AzureChatClient::new(
        AzureChatConfig {
            endpoint: config.azure.endpoint.clone(),
            deployment: config.azure.deployment.clone(),
            api_version: config.azure.api_version.clone(),
        },
        tokens,
    )
}
