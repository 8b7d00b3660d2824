//! # Landing Page Component
//!
//! Shown in place of the conversation while the history is empty.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub const LANDING_TEXT: &str = "Start a new chat with AI...";

pub struct LandingPage;

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text_lines = vec![
            Line::from(Span::styled(
                LANDING_TEXT,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Type a question below and press Enter",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                format!("askpad v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let [text_area] = Layout::vertical([Constraint::Length(text_lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);

        frame.render_widget(
            Paragraph::new(text_lines).alignment(Alignment::Center),
            text_area,
        );
    }
}
