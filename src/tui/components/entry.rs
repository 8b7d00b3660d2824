use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::answer::{LineKind, classify};
use crate::core::history::HistoryEntry;
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Blank row between consecutive entries.
const ENTRY_GAP: u16 = 1;
/// Answer bubbles are titled with the app name.
const ANSWER_TITLE: &str = "askpad";

/// Renders one history entry: the question bubble followed by the answer bubble.
///
/// Text is pre-wrapped with `textwrap` and rendered without `Paragraph`
/// wrapping, so [`calculate_height`](Self::calculate_height) is exact.
#[derive(Clone, Copy)]
pub struct EntryBlock<'a> {
    pub entry: &'a HistoryEntry,
    /// Set when the entry was jumped to from the sidebar
    pub is_highlighted: bool,
}

impl<'a> EntryBlock<'a> {
    pub fn new(entry: &'a HistoryEntry, is_highlighted: bool) -> Self {
        Self {
            entry,
            is_highlighted,
        }
    }

    /// Rows needed for this entry at `width`, including the trailing gap.
    pub fn calculate_height(entry: &HistoryEntry, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; still occupy a row
            return 1;
        }
        let question = question_rows(entry, content_width).len() as u16;
        let answer = answer_rows(entry, content_width).len() as u16;
        question + answer + VERTICAL_OVERHEAD * 2 + ENTRY_GAP
    }
}

fn wrap(text: &str, width: u16) -> Vec<String> {
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    textwrap::wrap(text, options)
        .into_iter()
        .map(|cow| cow.into_owned())
        .collect()
}

fn question_rows(entry: &HistoryEntry, width: u16) -> Vec<Line<'static>> {
    let mut rows: Vec<Line> = wrap(entry.question.trim(), width)
        .into_iter()
        .map(Line::from)
        .collect();
    if rows.is_empty() {
        rows.push(Line::default());
    }
    rows
}

fn answer_rows(entry: &HistoryEntry, width: u16) -> Vec<Line<'static>> {
    if entry.answer_lines.is_empty() {
        return vec![Line::styled(
            "(empty answer)",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )];
    }
    entry
        .answer_lines
        .iter()
        .flat_map(|line| {
            let style = line_style(classify(line));
            wrap(line.trim_end(), width)
                .into_iter()
                .map(move |row| Line::styled(row, style))
        })
        .collect()
}

fn line_style(kind: LineKind) -> Style {
    match kind {
        LineKind::Heading => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        LineKind::ListItem => Style::default().fg(Color::White),
        LineKind::Plain => Style::default(),
    }
}

fn bubble(title: &'static str, color: Color, highlighted: bool) -> Block<'static> {
    let border_style = if highlighted {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color).add_modifier(Modifier::DIM)
    };
    Block::bordered()
        .title(title)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title_style(border_style)
        .padding(Padding::horizontal(CONTENT_PAD_H))
}

impl<'a> Widget for EntryBlock<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return;
        }
        let question = question_rows(self.entry, content_width);
        let answer = answer_rows(self.entry, content_width);

        let [question_area, answer_area, _] = Layout::vertical([
            Constraint::Length(question.len() as u16 + VERTICAL_OVERHEAD),
            Constraint::Length(answer.len() as u16 + VERTICAL_OVERHEAD),
            Constraint::Min(0),
        ])
        .areas(area);

        Paragraph::new(Text::from(question))
            .style(Style::default().fg(Color::Cyan))
            .block(bubble("You", Color::Cyan, self.is_highlighted))
            .render(question_area, buf);

        Paragraph::new(Text::from(answer))
            .block(bubble(ANSWER_TITLE, Color::Green, self.is_highlighted))
            .render(answer_area, buf);
    }
}

impl<'a> Component for EntryBlock<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
