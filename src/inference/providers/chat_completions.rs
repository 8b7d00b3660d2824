//! Chat Completions provider (OpenAI-compatible `/chat/completions`).
//!
//! One POST per question, `stream: false`, one JSON body back. Non-2xx
//! statuses carry `{"error": {"message": ...}}` which is surfaced verbatim.

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::inference::{
    ApiErrorBody, ChatRequest, ChatResponse, CompletionProvider, ProviderError, SamplingParams,
};

/// Message shown when a failed response carries no readable error message.
pub const FALLBACK_ERROR_MESSAGE: &str = "Check the log";

/// Connection settings for the completion endpoint.
#[derive(Debug, Clone, Default)]
pub struct EndpointOptions {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Development proxy (all schemes).
    pub proxy: Option<String>,
    pub accept_invalid_certs: bool,
}

pub struct ChatCompletionsProvider {
    base_url: String,
    api_key: Option<String>,
    model: String,
    sampling: SamplingParams,
    client: reqwest::Client,
}

impl ChatCompletionsProvider {
    pub fn new(
        options: EndpointOptions,
        model: String,
        sampling: SamplingParams,
    ) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(proxy_url) = options.proxy.as_deref() {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| ProviderError::Config(format!("invalid proxy '{proxy_url}': {e}")))?;
            builder = builder.proxy(proxy);
        }
        if options.accept_invalid_certs {
            warn!("TLS certificate validation disabled for the completion endpoint");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        if options.api_key.is_none() {
            warn!("No API key configured; requests are sent without an Authorization header");
        }

        Ok(Self {
            base_url: options.base_url.trim_end_matches('/').to_string(),
            api_key: options.api_key,
            model,
            sampling,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Pulls the message out of an error body, falling back when it isn't there.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message().map(str::to_string))
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}

#[async_trait]
impl CompletionProvider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        "chat-completions"
    }

    async fn complete(&self, question: &str) -> Result<String, ProviderError> {
        let body = ChatRequest::single_question(&self.model, question, self.sampling);

        info!(
            "Chat completion request: model={}, question_len={}",
            self.model,
            question.len()
        );

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Chat completion response status: {}", status);

        if !status.is_success() {
            let err_body = response.text().await.unwrap_or_default();
            warn!("API error: {} - {}", status.as_u16(), err_body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error_message(&err_body),
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Parse("response has no choices".to_string()))?
            .message
            .content
            .ok_or_else(|| ProviderError::Parse("completion has no content".to_string()))?;

        debug!("Chat completion received: {} bytes", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_extracts_server_message() {
        assert_eq!(
            error_message(r#"{"error":{"message":"Model not found"}}"#),
            "Model not found"
        );
    }

    #[test]
    fn test_error_message_falls_back() {
        assert_eq!(error_message("Bad Gateway"), FALLBACK_ERROR_MESSAGE);
        assert_eq!(error_message(r#"{"error":{}}"#), FALLBACK_ERROR_MESSAGE);
        assert_eq!(error_message(""), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider = ChatCompletionsProvider::new(
            EndpointOptions {
                base_url: "http://localhost:9/v1/".to_string(),
                ..Default::default()
            },
            "m".to_string(),
            SamplingParams::default(),
        )
        .unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[test]
    fn test_invalid_proxy_is_config_error() {
        let result = ChatCompletionsProvider::new(
            EndpointOptions {
                base_url: "http://localhost:9".to_string(),
                proxy: Some("http://[::1".to_string()),
                ..Default::default()
            },
            "m".to_string(),
            SamplingParams::default(),
        );
        assert!(matches!(result, Err(ProviderError::Config(_))));
    }
}
