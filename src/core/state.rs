//! # Application State
//!
//! Core business state for askpad. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── provider: Arc<dyn CompletionProvider>  // completion endpoint
//! ├── history: ConversationHistory           // question/answer log
//! ├── model_name: String                     // shown in the title bar
//! ├── status_message: String                 // status bar text
//! ├── in_flight: usize                       // requests awaiting a reply
//! ├── alert: Option<String>                  // API error shown to the user
//! └── confirm_clear: bool                    // clear-history prompt is open
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::core::history::ConversationHistory;
use crate::inference::CompletionProvider;

pub struct App {
    pub provider: Arc<dyn CompletionProvider>,
    pub history: ConversationHistory,
    pub model_name: String,
    pub status_message: String,
    /// Submissions are not serialized; each one bumps this until it resolves.
    pub in_flight: usize,
    pub alert: Option<String>,
    pub confirm_clear: bool,
}

impl App {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        model_name: String,
        history: ConversationHistory,
    ) -> Self {
        Self {
            provider,
            history,
            model_name,
            status_message: String::from("Welcome to askpad!"),
            in_flight: 0,
            alert: None,
            confirm_clear: false,
        }
    }

    pub fn from_config(
        provider: Arc<dyn CompletionProvider>,
        config: &ResolvedConfig,
        history: ConversationHistory,
    ) -> Self {
        Self::new(provider, config.model_name.clone(), history)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}
