//! # Sidebar Component
//!
//! The "History" index: one row per entry, newest first.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SidebarState` lives in `TuiState`
//! - `Sidebar` is created each frame with borrowed state and the history

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::history::{ConversationHistory, HistoryEntry};
use crate::tui::component::Component;
use crate::tui::event::TuiEvent;

/// Persistent selection state. `selected` indexes the newest-first list.
#[derive(Default)]
pub struct SidebarState {
    pub selected: usize,
    pub list_state: ListState,
    pub focused: bool,
}

/// Events emitted by the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarEvent {
    /// Jump the conversation view to the entry with this id.
    Open(i64),
    /// Ask the question again and replace its answers.
    Reask(String),
    /// Request the clear-history confirmation.
    Clear,
    /// Hand focus back to the input.
    Leave,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the selection inside `0..len` after history changes.
    pub fn sync(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    pub fn selected_entry<'h>(&self, history: &'h ConversationHistory) -> Option<&'h HistoryEntry> {
        history.newest_first().nth(self.selected)
    }

    pub fn handle_event(
        &mut self,
        event: &TuiEvent,
        history: &ConversationHistory,
    ) -> Option<SidebarEvent> {
        let len = history.len();
        match event {
            TuiEvent::Escape => Some(SidebarEvent::Leave),
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                self.sync(len);
                None
            }
            TuiEvent::CursorDown => {
                self.selected += 1;
                self.sync(len);
                None
            }
            TuiEvent::Submit => self
                .selected_entry(history)
                .map(|entry| SidebarEvent::Open(entry.id)),
            TuiEvent::InputChar('r') => self
                .selected_entry(history)
                .map(|entry| SidebarEvent::Reask(entry.question.clone())),
            TuiEvent::InputChar('c') if len > 0 => Some(SidebarEvent::Clear),
            _ => None,
        }
    }
}

/// Transient render wrapper for the sidebar.
pub struct Sidebar<'a> {
    state: &'a mut SidebarState,
    history: &'a ConversationHistory,
}

impl<'a> Sidebar<'a> {
    pub fn new(state: &'a mut SidebarState, history: &'a ConversationHistory) -> Self {
        Self { state, history }
    }
}

impl<'a> Component for Sidebar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync(self.history.len());

        let border_style = if self.state.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let help_text = if self.state.focused {
            " ↵ Go  r Re-ask  c Clear "
        } else {
            " Tab Browse "
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" History ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        if self.history.is_empty() {
            let empty = Paragraph::new("No history yet.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let inner_width = area.width.saturating_sub(4) as usize; // borders + padding
        let items: Vec<ListItem> = self
            .history
            .newest_first()
            .map(|entry| ListItem::new(truncate_str(entry.question.trim(), inner_width)))
            .collect();

        let highlight = if self.state.focused {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let list = List::new(items)
            .block(block)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(highlight);

        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

/// Truncate a string to fit within `max_width` display columns, adding "..." if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    // Multi-line questions show their first line only
    let s = s.lines().next().unwrap_or("");
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let budget = max_width - 3;
    let mut width = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}
