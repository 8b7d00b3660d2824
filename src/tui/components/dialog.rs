//! # Dialog Overlays
//!
//! Modal boxes drawn over the whole frame:
//! - `ConfirmClear`: "Do you wanna delete all the history?" (y / n)
//! - `Alert`: an API error message, dismissed with Enter or Esc
//!
//! Both are stateless. The open/closed state lives in `App`.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::tui::component::Component;

pub const CONFIRM_CLEAR_PROMPT: &str = "Do you wanna delete all the history?";

pub struct ConfirmClear;

impl Component for ConfirmClear {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(50, 7, area);
        frame.render_widget(Clear, overlay);

        let block = dialog_block(" Clear history ", Color::Yellow)
            .title_bottom(Line::from(" y Yes  n No ").centered());
        let body = Paragraph::new(CONFIRM_CLEAR_PROMPT)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(body, overlay);
    }
}

pub struct Alert<'a> {
    pub message: &'a str,
}

impl<'a> Alert<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl<'a> Component for Alert<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(60, 9, area);
        frame.render_widget(Clear, overlay);

        let block = dialog_block(" Error ", Color::Red)
            .title_bottom(Line::from(" Enter OK ").centered());
        let body = Paragraph::new(Line::from(Span::styled(
            self.message,
            Style::default().fg(Color::White),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(body, overlay);
    }
}

fn dialog_block(title: &'static str, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Left)
        .padding(Padding::uniform(1))
}

/// A rect `percent_x` wide and `height` rows tall, centered in `outer`.
fn centered_rect(percent_x: u16, height: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(outer.height)),
        Constraint::Fill(1),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
