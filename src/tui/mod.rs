//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Routing
//!
//! ```text
//! Ctrl+C            → quit (always)
//! alert open        → Enter / Esc dismiss, everything else swallowed
//! clear prompt open → y confirms, n / Esc cancel
//! mouse wheel, PgUp → conversation scroll
//! Tab               → toggle focus (input ↔ sidebar)
//! focus = input     → draft editing, Enter asks, ↑/↓ scroll
//! focus = sidebar   → ↑/↓ select, Enter jump, r re-ask, c clear
//! ```
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the title bar spinner moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events, resize, or
//!   replies arriving from request tasks.

mod component;
mod components;
mod event;
mod ui;

use std::io::{self, stdout};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::core::action::{Action, Effect, Query, update};
use crate::core::config::ResolvedConfig;
use crate::core::history::HistoryStore;
use crate::core::request;
use crate::core::state::App;
use crate::inference::build_provider;
use crate::tui::component::EventHandler;
use crate::tui::components::{ConversationState, InputBox, InputEvent, SidebarEvent, SidebarState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Typing goes to the draft. Tab moves to the sidebar.
    Input,
    /// Arrow keys browse history. Typing jumps back to Input.
    Sidebar,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub conversation: ConversationState,
    pub sidebar: SidebarState,
    pub input_box: InputBox,
    pub focus: Focus,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            conversation: ConversationState::new(),
            sidebar: SidebarState::new(),
            input_box: InputBox::new(),
            focus: Focus::Input, // User expects to type immediately
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Sidebar,
            Focus::Sidebar => Focus::Input,
        };
    }

    /// Presentation side of an effect: what the panes do once core state changed.
    fn reflect(&mut self, effect: &Effect) {
        match effect {
            Effect::Persist { clear_draft: true } => {
                self.input_box.clear();
                self.conversation.follow();
            }
            Effect::RemovePersisted => {
                self.conversation = ConversationState::new();
                self.sidebar = SidebarState::new();
                self.focus = Focus::Input;
            }
            _ => {}
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: redraws reset the blink timer
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

pub fn run(config: ResolvedConfig) -> io::Result<()> {
    let provider = build_provider(&config).map_err(io::Error::other)?;
    let store = HistoryStore::open_file(config.storage_dir.as_deref())?;
    let history = store.load_or_default();
    let mut app = App::from_config(provider, &config, history);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let terminal_mode_guard = TerminalModeGuard::new();
    if let Err(e) = &terminal_mode_guard {
        warn!("Failed to enable terminal modes: {}", e);
    }

    // Channel for actions from request tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'event_loop: loop {
        if app.is_loading() {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading() {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effect = route_event(event, &mut app, &mut tui);
            if !apply_effect(&effect, &app, &mut tui, &store, &tx) {
                break 'event_loop;
            }
        }

        // Replies from request tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if !apply_effect(&effect, &app, &mut tui, &store, &tx) {
                break 'event_loop;
            }
        }
    }

    drop(terminal_mode_guard);
    ratatui::restore();
    info!("askpad shutting down");
    Ok(())
}

/// Translate one terminal event into state changes. Returns the `Effect`
/// the caller must carry out.
fn route_event(event: TuiEvent, app: &mut App, tui: &mut TuiState) -> Effect {
    match event {
        TuiEvent::ForceQuit => return update(app, Action::Quit),
        TuiEvent::Resize => return Effect::None,
        _ => {}
    }

    // Overlays are modal
    if app.alert.is_some() {
        return match event {
            TuiEvent::Submit | TuiEvent::Escape => update(app, Action::DismissAlert),
            _ => Effect::None,
        };
    }
    if app.confirm_clear {
        return match event {
            TuiEvent::InputChar('y' | 'Y') => update(app, Action::ConfirmClear),
            TuiEvent::InputChar('n' | 'N') | TuiEvent::Escape => {
                update(app, Action::CancelClear)
            }
            _ => Effect::None,
        };
    }

    if matches!(
        event,
        TuiEvent::ScrollUp | TuiEvent::ScrollDown | TuiEvent::ScrollPageUp | TuiEvent::ScrollPageDown
    ) {
        tui.conversation.handle_event(&event);
        return Effect::None;
    }
    if event == TuiEvent::FocusNext {
        tui.toggle_focus();
        return Effect::None;
    }

    match tui.focus {
        Focus::Input => match event {
            TuiEvent::CursorUp | TuiEvent::CursorDown => {
                tui.conversation.handle_event(&event);
                Effect::None
            }
            _ => match tui.input_box.handle_event(&event) {
                Some(InputEvent::Submit(text)) => update(app, Action::Submit(text)),
                Some(InputEvent::ContentChanged) | None => Effect::None,
            },
        },
        Focus::Sidebar => match tui.sidebar.handle_event(&event, &app.history) {
            Some(SidebarEvent::Open(id)) => {
                if let Some(index) = app.history.position(id) {
                    tui.conversation.scroll_to_entry(index, id);
                }
                Effect::None
            }
            Some(SidebarEvent::Reask(question)) => update(app, Action::Reask(question)),
            Some(SidebarEvent::Clear) => update(app, Action::RequestClear),
            Some(SidebarEvent::Leave) => {
                tui.focus = Focus::Input;
                Effect::None
            }
            None => {
                // Typing auto-switches to the input and forwards the event
                let is_sidebar_key = matches!(event, TuiEvent::InputChar('r' | 'c'));
                if !is_sidebar_key && matches!(event, TuiEvent::InputChar(_) | TuiEvent::Paste(_))
                {
                    tui.focus = Focus::Input;
                    tui.input_box.handle_event(&event);
                }
                Effect::None
            }
        },
    }
}

/// Carry out an effect. Returns `false` when the loop should stop.
fn apply_effect(
    effect: &Effect,
    app: &App,
    tui: &mut TuiState,
    store: &HistoryStore,
    tx: &mpsc::Sender<Action>,
) -> bool {
    tui.reflect(effect);
    match effect {
        Effect::Quit => return false,
        Effect::SpawnRequest(query) => spawn_request(app, query.clone(), tx.clone()),
        Effect::Persist { .. } | Effect::RemovePersisted => store.apply(effect, &app.history),
        Effect::None => {}
    }
    true
}

fn spawn_request(app: &App, query: Query, tx: mpsc::Sender<Action>) {
    info!("Spawning {:?} request ({} in flight)", query.mode, app.in_flight);
    let provider = app.provider.clone();
    tokio::spawn(async move {
        let action = request::perform(provider.as_ref(), query).await;
        if tx.send(action).is_err() {
            warn!("Failed to deliver reply: receiver dropped");
        }
    });
}
