//! # Conversation Component
//!
//! Scrollable view of the whole history, oldest entry at the top.
//!
//! ## Architecture
//!
//! `Conversation` is a transient component (created each frame) that wraps
//! `&'a mut ConversationState` (persistent state) and the history (props).
//!
//! Since `Component::render` takes `&mut self`, the layout cache and scroll
//! state are updated during the render pass, in line with Ratatui's
//! `StatefulWidget` pattern. Offsets from the last frame drive
//! `scroll_to_entry`.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::history::ConversationHistory;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::entry::EntryBlock;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the conversation view.
/// Must be persisted in the parent TuiState.
pub struct ConversationState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Entry id last jumped to from the sidebar
    pub highlighted: Option<i64>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Content exists below the viewport
    pub has_unseen_content: bool,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            highlighted: None,
            viewport_height: 0,
            has_unseen_content: false,
        }
    }

    fn max_scroll(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Align the top of the entry at `index` (chronological) with the top of
    /// the viewport and highlight it.
    pub fn scroll_to_entry(&mut self, index: usize, id: i64) {
        let Some(item_top) = self.layout.item_top(index) else {
            return;
        };
        self.highlighted = Some(id);
        self.scroll_state.set_offset(Position { x: 0, y: item_top });
        self.stick_to_bottom = false;
        self.clamp_scroll();
    }

    /// Re-attach to the bottom so the newest entry is visible.
    pub fn follow(&mut self) {
        self.highlighted = None;
        self.stick_to_bottom = true;
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable conversation view.
/// Created fresh each frame with references to state and data.
pub struct Conversation<'a> {
    pub state: &'a mut ConversationState,
    pub history: &'a ConversationHistory,
}

impl<'a> Conversation<'a> {
    pub fn new(state: &'a mut ConversationState, history: &'a ConversationHistory) -> Self {
        Self { state, history }
    }
}

impl<'a> Component for Conversation<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let entries = self.history.entries();

        // 1. Update layout cache, measuring only entries not already cached
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(entries.len(), content_width, self.history.revision());
        layout.heights.truncate(reusable.min(layout.heights.len()));
        let measured = layout.heights.len();
        layout.heights.extend(
            entries[measured..]
                .iter()
                .map(|entry| EntryBlock::calculate_height(entry, content_width)),
        );
        layout.recompute_prefix();
        layout.update_metadata(entries.len(), content_width, self.history.revision());
        let total_height = layout.total_height();

        // 2. Clamp scroll offset to prevent overscrolling past content
        self.state.viewport_height = area.height;
        if self.state.stick_to_bottom {
            let max_y = self.state.max_scroll();
            self.state.scroll_state.set_offset(Position { x: 0, y: max_y });
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible entries into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible_range {
            let entry = &entries[i];
            let top = self.state.layout.item_top(i).unwrap_or(0);
            let rect = Rect::new(0, top, content_width, self.state.layout.heights[i]);
            let is_highlighted = self.state.highlighted == Some(entry.id);
            scroll_view.render_widget(EntryBlock::new(entry, is_highlighted), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        let current_offset = self.state.scroll_state.offset().y;
        self.state.has_unseen_content = current_offset < total_height.saturating_sub(area.height);
    }
}

/// EventHandler lives on the state because `Conversation` is rebuilt every frame.
impl EventHandler for ConversationState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
#[derive(Default)]
pub struct LayoutCache {
    pub heights: Vec<u16>,
    /// Running sums: `prefix_heights[i]` is the bottom edge of entry `i`
    pub prefix_heights: Vec<u16>,
    /// Inputs the cached heights were measured against
    pub entry_count: usize,
    pub content_width: u16,
    pub revision: u64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many leading cached heights are still valid.
    pub fn reusable_count(&self, entry_count: usize, content_width: u16, revision: u64) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }

        // Fewer entries than cached means history was cleared
        if entry_count < self.entry_count {
            return 0;
        }

        // A re-ask rewrote answers somewhere in the list
        if revision != self.revision {
            return 0;
        }

        self.entry_count
    }

    pub fn update_metadata(&mut self, entry_count: usize, content_width: u16, revision: u64) {
        self.entry_count = entry_count;
        self.content_width = content_width;
        self.revision = revision;
    }

    pub fn recompute_prefix(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Top edge of entry `index`, if it exists.
    pub fn item_top(&self, index: usize) -> Option<u16> {
        if index >= self.prefix_heights.len() {
            return None;
        }
        Some(if index == 0 {
            0
        } else {
            self.prefix_heights[index - 1]
        })
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::app_with_history;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn cache(heights: &[u16]) -> LayoutCache {
        let mut cache = LayoutCache::new();
        cache.heights = heights.to_vec();
        cache.recompute_prefix();
        cache
    }

    fn draw(state: &mut ConversationState, history: &ConversationHistory, h: u16) -> String {
        let backend = TestBackend::new(40, h);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| Conversation::new(state, history).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_prefix_heights_and_tops() {
        let cache = cache(&[7, 5, 9]);
        assert_eq!(cache.prefix_heights, vec![7, 12, 21]);
        assert_eq!(cache.total_height(), 21);
        assert_eq!(cache.item_top(0), Some(0));
        assert_eq!(cache.item_top(2), Some(12));
        assert_eq!(cache.item_top(3), None);
    }

    #[test]
    fn test_layout_cache_reusable() {
        let mut cache = cache(&[7; 5]);
        cache.update_metadata(5, 80, 0);

        // Same everything: all reusable
        assert_eq!(cache.reusable_count(5, 80, 0), 5);
        // Entry appended: cached prefix still valid
        assert_eq!(cache.reusable_count(6, 80, 0), 5);
        // Width changed
        assert_eq!(cache.reusable_count(5, 40, 0), 0);
        // History cleared or shortened
        assert_eq!(cache.reusable_count(2, 80, 0), 0);
        // Answers replaced in place
        assert_eq!(cache.reusable_count(5, 80, 1), 0);
        // Nothing cached yet
        assert_eq!(LayoutCache::new().reusable_count(0, 0, 0), 0);
    }

    #[test]
    fn test_render_remeasures_after_reask() {
        let mut app = app_with_history(&[("first question", &["short"])]);
        let mut state = ConversationState::new();
        draw(&mut state, &app.history, 30);
        let before = state.layout.total_height();

        let longer: Vec<String> = (1..=4).map(|i| format!("line {i}")).collect();
        app.history.replace_answers("first question", &longer);
        let text = draw(&mut state, &app.history, 30);

        assert_eq!(state.layout.total_height(), before + 3);
        assert!(text.contains("line 4"));
    }

    #[test]
    fn test_render_measures_appended_entries() {
        let mut app = app_with_history(&[("first question", &["first answer"])]);
        let mut state = ConversationState::new();
        draw(&mut state, &app.history, 30);
        assert_eq!(state.layout.heights.len(), 1);

        app.history.append("second question".into(), vec!["second answer".into()]);
        let text = draw(&mut state, &app.history, 30);
        assert_eq!(state.layout.heights.len(), 2);
        assert_eq!(state.layout.entry_count, 2);
        assert!(text.contains("second answer"));
    }

    #[test]
    fn test_visible_range() {
        let cache = cache(&[10; 10]);
        // Viewport rows 40..50 with a half-viewport buffer on either side
        assert_eq!(cache.visible_range(40, 10), 3..6);
        assert_eq!(cache.visible_range(0, 10), 0..2);
        assert_eq!(cache.visible_range(95, 10), 9..10);
    }

    #[test]
    fn test_scroll_to_entry_aligns_top() {
        let mut state = ConversationState::new();
        state.layout = cache(&[10; 5]);
        state.viewport_height = 10;

        state.scroll_to_entry(2, 42);
        assert_eq!(state.scroll_state.offset().y, 20);
        assert_eq!(state.highlighted, Some(42));
        assert!(!state.stick_to_bottom);

        // The last entry cannot scroll past the bottom
        state.scroll_to_entry(4, 43);
        assert_eq!(state.scroll_state.offset().y, 40);

        // Unknown index is ignored
        state.scroll_to_entry(9, 44);
        assert_eq!(state.highlighted, Some(43));
    }

    #[test]
    fn test_follow_reattaches() {
        let mut state = ConversationState::new();
        state.stick_to_bottom = false;
        state.highlighted = Some(1);
        state.follow();
        assert!(state.stick_to_bottom);
        assert!(state.highlighted.is_none());
    }

    #[test]
    fn test_scroll_up_detaches_from_bottom() {
        let mut state = ConversationState::new();
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
    }

    #[test]
    fn test_render_sticks_to_newest_entry() {
        let app = app_with_history(&[
            ("first question", &["first answer"]),
            ("second question", &["second answer"]),
            ("third question", &["third answer"]),
        ]);
        let mut state = ConversationState::new();
        // Each entry is 7 rows; a 10-row viewport only fits the tail
        let text = draw(&mut state, &app.history, 10);
        assert!(text.contains("third answer"));
        assert!(!text.contains("first question"));
        assert!(!state.has_unseen_content);
    }

    #[test]
    fn test_render_after_jump_shows_entry() {
        let app = app_with_history(&[
            ("first question", &["first answer"]),
            ("second question", &["second answer"]),
            ("third question", &["third answer"]),
        ]);
        let mut state = ConversationState::new();
        draw(&mut state, &app.history, 10);

        state.scroll_to_entry(0, 1_000);
        let text = draw(&mut state, &app.history, 10);
        assert!(text.contains("first question"));
        assert!(state.has_unseen_content);
    }
}
