//! Configuration for askcypher.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (ASKCYPHER__ prefix, `__` separator)
//! 2. Config file (askcypher.toml)
//! 3. Defaults
//!
//! Values are passed through to the drivers verbatim; no validation
//! happens here.

use serde::Deserialize;

/// Top-level configuration: one Neo4j target, one completion endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub neo4j: Neo4jSettings,

    #[serde(default)]
    pub azure: AzureSettings,
}

/// Neo4j connection parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    /// Bolt URI. The `+ssc` scheme selects encryption with full
    /// certificate trust.
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Target database name.
    #[serde(default = "default_database")]
    pub database: String,
}

/// Azure OpenAI completion settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AzureSettings {
    /// Resource endpoint, e.g. `https://myresource.openai.azure.com`.
    #[serde(default)]
    pub endpoint: String,

    /// Deployment name completions are routed to.
    #[serde(default = "default_deployment")]
    pub deployment: String,

    /// API version query parameter, passed through verbatim.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Static bearer token. When unset, the ASKCYPHER_TOKEN environment
    /// variable is read on every request instead.
    #[serde(default)]
    pub token: Option<String>,
}

impl AppConfig {
    /// Load configuration from `<file_prefix>.toml` and `ASKCYPHER__*`
    /// environment variables, falling back to defaults.
    pub fn load(file_prefix: &str) -> Self {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("ASKCYPHER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build();

        match cfg {
            Ok(c) => c.try_deserialize().unwrap_or_default(),
            Err(_) => AppConfig::default(),
        }
    }
}

fn default_uri() -> String {
    "neo4j+ssc://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_database() -> String {
    "neo4j".to_string()
}

fn default_deployment() -> String {
    "gpt-4".to_string()
}

fn default_api_version() -> String {
    "2024-02-01".to_string()
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: String::new(),
            database: default_database(),
        }
    }
}

impl Default for AzureSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            deployment: default_deployment(),
            api_version: default_api_version(),
            token: None,
        }
    }
}
