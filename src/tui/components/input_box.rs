//! # InputBox Component
//!
//! Single-line draft field for the next question.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing and bracketed paste)
//! - Handle editing (backspace, delete, cursor movement)
//! - Emit `Submit` on Enter
//! - Scroll horizontally so the cursor stays visible
//!
//! The draft survives a submit. The event loop clears it once the answer
//! has been stored, so a failed request leaves the question in place.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const PLACEHOLDER: &str = "Ask anything...";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted a non-blank draft (Enter pressed)
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    /// Draft text (Internal State)
    pub buffer: String,
    /// Whether the input has keyboard focus (Prop)
    pub focused: bool,
    /// Byte offset of the cursor in `buffer`
    cursor: usize,
    /// Display columns hidden off the left edge
    scroll_cols: usize,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            focused: true,
            cursor: 0,
            scroll_cols: 0,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll_cols = 0;
    }

    fn cursor_col(&self) -> usize {
        self.buffer[..self.cursor].width()
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Keep the cursor column within `[scroll_cols, scroll_cols + width)`.
    fn update_scroll(&mut self, width: usize) {
        let col = self.cursor_col();
        if col < self.scroll_cols {
            self.scroll_cols = col;
        } else if width > 0 && col >= self.scroll_cols + width {
            self.scroll_cols = col + 1 - width;
        }
    }

    /// The slice of the draft that fits in `width` columns after scrolling.
    fn visible_text(&self, width: usize) -> String {
        let mut col = 0;
        let mut out = String::new();
        for c in self.buffer.chars() {
            let w = c.width().unwrap_or(0);
            if col >= self.scroll_cols {
                if col + w > self.scroll_cols + width {
                    break;
                }
                out.push(c);
            }
            col += w;
        }
        out
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title("Ask");
        let inner = block.inner(area);
        let width = inner.width as usize;
        self.update_scroll(width);

        let input = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Paragraph::new(self.visible_text(width)).style(Style::default().fg(Color::Green))
        };
        frame.render_widget(input.block(block), area);

        if self.focused && inner.width > 0 && inner.height > 0 {
            let offset = self.cursor_col().saturating_sub(self.scroll_cols) as u16;
            frame.set_cursor_position((inner.x + offset.min(inner.width - 1), inner.y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut tmp));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single line: fold line breaks into spaces
                let flat: String = text
                    .chars()
                    .filter(|c| *c != '\r')
                    .map(|c| if c == '\n' { ' ' } else { c })
                    .collect();
                self.insert_str(&flat);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                let prev = prev_char_boundary(&self.buffer, self.cursor)?;
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                let next = next_char_boundary(&self.buffer, self.cursor)?;
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor)?;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorRight => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor)?;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                (!self.buffer.trim().is_empty()).then(|| InputEvent::Submit(self.buffer.clone()))
            }
            _ => None,
        }
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> Option<usize> {
    text[..pos].char_indices().next_back().map(|(i, _)| i)
}

fn next_char_boundary(text: &str, pos: usize) -> Option<usize> {
    text[pos..].chars().next().map(|c| pos + c.len_utf8())
}
