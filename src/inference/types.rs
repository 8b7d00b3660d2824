//! Chat Completions wire types.
//!
//! Only the fields askpad sends or reads are modeled; everything else in the
//! response body is ignored by serde.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Fixed sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
            top_p: 1.0,
        }
    }
}

/// The request body: one user message, fixed sampling, no streaming.
#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stream: bool,
}

impl ChatRequest {
    pub fn single_question(model: &str, question: &str, sampling: SamplingParams) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::user(question)],
            max_tokens: sampling.max_tokens,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            stream: false,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
pub struct ResponseMessage {
    /// Null for some refusals and tool-only replies.
    #[serde(default)]
    pub content: Option<String>,
}

/// Error body returned with non-2xx statuses: `{"error": {"message": "..."}}`.
#[derive(Deserialize, Debug, Default)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|e| e.message.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let req = ChatRequest::single_question("m", "hi", SamplingParams::default());
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "m",
                "messages": [{"role": "user", "content": "hi"}],
                "max_tokens": 500,
                "temperature": 0.7f32,
                "top_p": 1.0,
                "stream": false
            })
        );
    }

    #[test]
    fn test_response_ignores_unknown_fields() {
        let body = r#"{
            "id": "cmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 1}
        }"#;
        let resp: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_null_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let resp: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.choices[0].message.content, None);
    }

    #[test]
    fn test_error_body_message() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"error": {"message": "Invalid model", "code": 400}}"#).unwrap();
        assert_eq!(body.message(), Some("Invalid model"));

        let empty: ApiErrorBody = serde_json::from_str(r#"{"detail": "nope"}"#).unwrap();
        assert_eq!(empty.message(), None);
    }
}
