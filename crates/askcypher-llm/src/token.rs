//! Bearer-token providers for the completion endpoint.

use async_trait::async_trait;

use crate::client::GenerationError;

/// Supplies a bearer token for the completion endpoint.
///
/// Consulted once per request so short-lived credentials stay fresh
/// without the client tracking expiry itself.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String, GenerationError>;
}

#[async_trait]
impl<P: TokenProvider + ?Sized> TokenProvider for Box<P> {
    async fn bearer_token(&self) -> Result<String, GenerationError> {
        (**self).bearer_token().await
    }
}

/// A fixed token: an API key or a long-lived access token.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, GenerationError> {
        Ok(self.token.clone())
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Reads the token from an environment variable on every call, so an
/// external refresher can rotate it while the process runs.
#[derive(Debug)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn bearer_token(&self) -> Result<String, GenerationError> {
        std::env::var(&self.var).map_err(|_| {
            GenerationError::Auth(format!("token variable {} is not set", self.var))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_returns_token() {
        let provider = StaticTokenProvider::new("secret");
        assert_eq!(provider.bearer_token().await.unwrap(), "secret");
    }

    #[tokio::test]
    async fn test_env_provider_missing_var_is_auth_error() {
        let provider = EnvTokenProvider::new("ASKCYPHER_TEST_TOKEN_UNSET");
        match provider.bearer_token().await {
            Err(GenerationError::Auth(_)) => {}
            other => panic!("expected Auth error, got {other:?}"),
        }
    }

    #[test]
    fn test_static_provider_debug_redacts_token() {
        let provider = StaticTokenProvider::new("secret");
        assert!(!format!("{provider:?}").contains("secret"));
    }
}
