use std::fmt;

use async_trait::async_trait;

/// Errors that can occur while asking the completion endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider misconfigured (bad URL, bad proxy).
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// The endpoint answered with a non-2xx status.
    Api { status: u16, message: String },
    /// The success body could not be read as a completion.
    Parse(String),
}

impl ProviderError {
    /// True for failures the user is told about. Everything else is only logged.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, ProviderError::Api { .. })
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => write!(f, "Error {status}: {message}"),
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Sends one question and returns the first completion's raw text.
    async fn complete(&self, question: &str) -> Result<String, ProviderError>;
}
