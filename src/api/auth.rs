//! Bearer credentials for backend requests.
//!
//! Authentication itself lives outside this crate; the console only asks for
//! the current token and reports rejections back.

use std::sync::Arc;

use crate::config::ApiConfig;

/// Supplies the bearer token and is told when the backend rejects it.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;

    /// Called on every 401. The default does nothing.
    fn on_unauthorized(&self) {}
}

/// A fixed token, e.g. from config or the command line.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }

    fn on_unauthorized(&self) {
        tracing::error!("Backend rejected the configured API token");
    }
}

/// Reads the token from an environment variable on every request.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvToken {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|t| !t.is_empty())
    }

    fn on_unauthorized(&self) {
        tracing::error!(var = %self.var, "Backend rejected the API token from the environment");
    }
}

/// No credential at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct Anonymous;

impl CredentialProvider for Anonymous {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Inline `token` wins over `token_env`.
pub fn credentials_for(api: &ApiConfig) -> Arc<dyn CredentialProvider> {
    match &api.token {
        Some(token) if !token.is_empty() => Arc::new(StaticToken::new(token.clone())),
        _ => Arc::new(EnvToken::new(api.token_env.clone())),
    }
}
