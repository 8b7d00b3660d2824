use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{
    Alert, ConfirmClear, Conversation, LandingPage, Sidebar, TitleBar,
};
use crate::tui::{Focus, TuiState};

/// Height of the single-line input box including borders.
const INPUT_HEIGHT: u16 = 3;

/// Splits the frame into sidebar | (title / conversation / input).
pub fn layout(area: Rect) -> [Rect; 4] {
    use Constraint::{Length, Min, Ratio};
    let [sidebar_area, main_area] = Layout::horizontal([Ratio(1, 5), Min(0)]).areas(area);
    let [title_area, conversation_area, input_area] =
        Layout::vertical([Length(1), Min(0), Length(INPUT_HEIGHT)]).areas(main_area);
    [sidebar_area, title_area, conversation_area, input_area]
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let [sidebar_area, title_area, conversation_area, input_area] = layout(frame.area());
    let overlay_open = app.alert.is_some() || app.confirm_clear;

    tui.sidebar.focused = tui.focus == Focus::Sidebar;
    Sidebar::new(&mut tui.sidebar, &app.history).render(frame, sidebar_area);

    if app.history.is_empty() {
        tui.conversation.has_unseen_content = false;
        LandingPage.render(frame, conversation_area);
    } else {
        Conversation::new(&mut tui.conversation, &app.history).render(frame, conversation_area);
    }

    // After the conversation so "↓ New" reflects this frame's scroll
    TitleBar::new(
        app.model_name.clone(),
        app.status_message.clone(),
        tui.conversation.has_unseen_content,
    )
    .with_in_flight(app.in_flight, spinner_frame)
    .render(frame, title_area);

    tui.input_box.focused = tui.focus == Focus::Input && !overlay_open;
    tui.input_box.render(frame, input_area);

    if let Some(message) = &app.alert {
        Alert::new(message).render(frame, frame.area());
    } else if app.confirm_clear {
        ConfirmClear.render(frame, frame.area());
    }
}
