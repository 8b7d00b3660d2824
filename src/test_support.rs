//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::history::ConversationHistory;
use crate::core::state::App;
use crate::inference::{CompletionProvider, ProviderError};

/// A provider that replays canned results in order and records what it was asked.
/// Once the script runs out it answers with an empty completion.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, question: &str) -> Result<String, ProviderError> {
        self.asked.lock().unwrap().push(question.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// Creates an App with a scripted provider, empty history, and "test-model".
pub fn test_app() -> App {
    App::new(
        Arc::new(ScriptedProvider::default()),
        "test-model".to_string(),
        ConversationHistory::new(),
    )
}

/// Creates an App whose history holds the given question/answers pairs,
/// with ids 1000, 2000, ...
pub fn app_with_history(pairs: &[(&str, &[&str])]) -> App {
    let mut history = ConversationHistory::new();
    for (i, (question, answers)) in pairs.iter().enumerate() {
        history.append_at(
            question.to_string(),
            answers.iter().map(|s| s.to_string()).collect(),
            (i as i64 + 1) * 1_000,
        );
    }
    let mut app = test_app();
    app.history = history;
    app
}
