//! # TitleBar Component
//!
//! Top status bar showing application state and notifications.
//!
//! ## Responsibilities
//!
//! - Display current model name
//! - Display status messages (e.g., "Asking...", "History cleared")
//! - Show a spinner and the number of unanswered questions while requests run
//! - Show "↓ New" indicator when there's unseen content below scroll
//!
//! ## Conditional Formatting
//!
//! Segments are appended in priority order, each separated by `" | "`:
//!
//! 1. `"askpad (model: m)"` (always)
//! 2. status message (if non-empty)
//! 3. `"⠋ 2 pending"` (if requests are in flight)
//! 4. `"↓ New"` (if there's unseen content)

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::tui::component::Component;

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Top status bar. Purely presentational, all fields are props.
pub struct TitleBar {
    pub model_name: String,
    pub status_message: String,
    /// Requests awaiting a reply
    pub in_flight: usize,
    pub spinner_frame: usize,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(model_name: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            model_name,
            status_message,
            in_flight: 0,
            spinner_frame: 0,
            has_unseen_content,
        }
    }

    pub fn with_in_flight(mut self, in_flight: usize, spinner_frame: usize) -> Self {
        self.in_flight = in_flight;
        self.spinner_frame = spinner_frame;
        self
    }

    fn text(&self) -> String {
        let mut text = format!("askpad (model: {})", self.model_name);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        if self.in_flight > 0 {
            let spinner = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
            text.push_str(&format!(" | {} {} pending", spinner, self.in_flight));
        }
        if self.has_unseen_content {
            text.push_str(" | ↓ New");
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}
