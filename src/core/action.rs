//! # Actions
//!
//! Everything that can happen in askpad becomes an `Action`.
//! User presses Enter? That's `Action::Submit(draft)`.
//! The endpoint answers? That's `Action::AnswerReceived { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns the `Effect` the caller must perform. No side
//! effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::core::answer::answer_lines;
use crate::core::state::App;
use crate::inference::ProviderError;

/// Whether a reply appends a new entry or refreshes existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskMode {
    /// Normal ask from the draft.
    Ask,
    /// Regenerate the answer for a question already in history.
    Reask,
}

/// A question on its way to the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub question: String,
    pub mode: AskMode,
}

#[derive(Debug)]
pub enum Action {
    /// Draft submitted from the input.
    Submit(String),
    /// Re-ask an existing question (matched by exact text).
    Reask(String),
    AnswerReceived { query: Query, raw: String },
    RequestFailed { query: Query, error: ProviderError },
    /// Open the clear-history confirmation.
    RequestClear,
    ConfirmClear,
    CancelClear,
    DismissAlert,
    Quit,
}

/// What the caller must do after `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Send the query to the completion endpoint.
    SpawnRequest(Query),
    /// Write the full history to storage. `clear_draft` is set after a
    /// successful normal ask.
    Persist { clear_draft: bool },
    /// Drop the persisted copy of history.
    RemovePersisted,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => spawn(app, text, AskMode::Ask),
        Action::Reask(question) => spawn(app, question, AskMode::Reask),
        Action::AnswerReceived { query, raw } => {
            app.in_flight = app.in_flight.saturating_sub(1);
            let lines = answer_lines(&raw);
            debug!(
                "Answer for {:?}: {} bytes, {} lines",
                query.mode,
                raw.len(),
                lines.len()
            );
            match query.mode {
                AskMode::Ask => {
                    app.history.append(query.question, lines);
                    settle_status(app, "Answer received");
                    Effect::Persist { clear_draft: true }
                }
                AskMode::Reask => {
                    let updated = app.history.replace_answers(&query.question, &lines);
                    if updated == 0 {
                        info!("Re-asked question no longer in history, dropping answer");
                        settle_status(app, "");
                        return Effect::None;
                    }
                    settle_status(app, "Answer regenerated");
                    Effect::Persist { clear_draft: false }
                }
            }
        }
        Action::RequestFailed { query, error } => {
            app.in_flight = app.in_flight.saturating_sub(1);
            settle_status(app, "");
            if error.is_user_visible() {
                app.alert = Some(error.to_string());
            } else {
                // Network and parse failures are not surfaced to the user
                warn!("Request for {:?} failed: {}", query.question, error);
            }
            Effect::None
        }
        Action::RequestClear => {
            if !app.history.is_empty() {
                app.confirm_clear = true;
            }
            Effect::None
        }
        Action::ConfirmClear => {
            if !app.confirm_clear {
                return Effect::None;
            }
            app.confirm_clear = false;
            app.history.clear();
            app.status_message = String::from("History cleared");
            Effect::RemovePersisted
        }
        Action::CancelClear => {
            app.confirm_clear = false;
            Effect::None
        }
        Action::DismissAlert => {
            app.alert = None;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn spawn(app: &mut App, question: String, mode: AskMode) -> Effect {
    if question.trim().is_empty() {
        return Effect::None;
    }
    app.in_flight += 1;
    app.status_message = String::from("Asking...");
    Effect::SpawnRequest(Query { question, mode })
}

/// Replaces the "Asking..." status once no request is left in flight.
fn settle_status(app: &mut App, message: &str) {
    if app.in_flight == 0 {
        app.status_message = message.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app_with_history, test_app};

    fn ask(question: &str) -> Query {
        Query {
            question: question.to_string(),
            mode: AskMode::Ask,
        }
    }

    #[test]
    fn test_submit_spawns_request_without_touching_history() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("Hello?".into()));
        assert_eq!(effect, Effect::SpawnRequest(ask("Hello?")));
        assert!(app.history.is_empty());
        assert_eq!(app.in_flight, 1);
        assert!(app.is_loading());
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut app = test_app();
        for text in ["", "   ", "\n\t"] {
            assert_eq!(update(&mut app, Action::Submit(text.into())), Effect::None);
        }
        assert_eq!(app.in_flight, 0);
        assert_eq!(app.status_message, "Welcome to askpad!");
    }

    #[test]
    fn test_answer_appends_one_entry() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hello?".into()));
        let effect = update(
            &mut app,
            Action::AnswerReceived {
                query: ask("Hello?"),
                raw: "**Hi** there\n\nHow can I help?".into(),
            },
        );
        assert_eq!(effect, Effect::Persist { clear_draft: true });
        assert_eq!(app.history.len(), 1);
        let entry = &app.history.entries()[0];
        assert_eq!(entry.question, "Hello?");
        assert_eq!(entry.answer_lines, vec!["Hi there", "How can I help?"]);
        assert_eq!(app.in_flight, 0);
    }

    #[test]
    fn test_overlapping_submissions_both_land() {
        let mut app = test_app();
        update(&mut app, Action::Submit("one".into()));
        update(&mut app, Action::Submit("two".into()));
        assert_eq!(app.in_flight, 2);
        // Replies arrive out of order; each appends in arrival order
        update(&mut app, Action::AnswerReceived { query: ask("two"), raw: "2".into() });
        update(&mut app, Action::AnswerReceived { query: ask("one"), raw: "1".into() });
        let questions: Vec<_> = app.history.entries().iter().map(|e| e.question.clone()).collect();
        assert_eq!(questions, vec!["two", "one"]);
        assert_eq!(app.in_flight, 0);
    }

    #[test]
    fn test_status_stays_asking_while_requests_pending() {
        let mut app = test_app();
        update(&mut app, Action::Submit("one".into()));
        update(&mut app, Action::Submit("two".into()));

        update(&mut app, Action::AnswerReceived { query: ask("one"), raw: "1".into() });
        assert_eq!(app.in_flight, 1);
        assert_eq!(app.status_message, "Asking...");

        update(&mut app, Action::AnswerReceived { query: ask("two"), raw: "2".into() });
        assert_eq!(app.status_message, "Answer received");
    }

    #[test]
    fn test_failure_keeps_asking_status_for_pending_request() {
        let mut app = test_app();
        update(&mut app, Action::Submit("one".into()));
        update(&mut app, Action::Submit("two".into()));

        update(
            &mut app,
            Action::RequestFailed {
                query: ask("one"),
                error: ProviderError::Network("reset".into()),
            },
        );
        assert_eq!(app.status_message, "Asking...");
    }

    #[test]
    fn test_reask_replaces_answers_in_place() {
        let mut app = app_with_history(&[("first", &["old"]), ("second", &["keep"])]);
        let before = app.history.entries()[0].id;

        let effect = update(&mut app, Action::Reask("first".into()));
        let Effect::SpawnRequest(query) = effect else {
            panic!("expected SpawnRequest, got {effect:?}");
        };
        assert_eq!(query.mode, AskMode::Reask);

        let effect = update(&mut app, Action::AnswerReceived { query, raw: "new\nlines".into() });
        assert_eq!(effect, Effect::Persist { clear_draft: false });
        assert_eq!(app.history.len(), 2);
        assert_eq!(app.history.entries()[0].id, before);
        assert_eq!(app.history.entries()[0].answer_lines, vec!["new", "lines"]);
        assert_eq!(app.history.entries()[1].answer_lines, vec!["keep"]);
    }

    #[test]
    fn test_reask_for_vanished_question_is_dropped() {
        let mut app = app_with_history(&[("first", &["old"])]);
        let query = Query { question: "gone".into(), mode: AskMode::Reask };
        update(&mut app, Action::Reask("gone".into()));
        let effect = update(&mut app, Action::AnswerReceived { query, raw: "x".into() });
        assert_eq!(effect, Effect::None);
        assert_eq!(app.history.entries()[0].answer_lines, vec!["old"]);
    }

    #[test]
    fn test_api_error_raises_alert_and_leaves_history() {
        let mut app = app_with_history(&[("first", &["old"])]);
        let snapshot = app.history.clone();
        update(&mut app, Action::Submit("bad".into()));
        let effect = update(
            &mut app,
            Action::RequestFailed {
                query: ask("bad"),
                error: ProviderError::Api { status: 400, message: "Invalid model".into() },
            },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(app.alert.as_deref(), Some("Error 400: Invalid model"));
        assert_eq!(app.history, snapshot);
        assert_eq!(app.in_flight, 0);

        update(&mut app, Action::DismissAlert);
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_network_error_is_silent() {
        let mut app = test_app();
        update(&mut app, Action::Submit("q".into()));
        let effect = update(
            &mut app,
            Action::RequestFailed {
                query: ask("q"),
                error: ProviderError::Network("connection refused".into()),
            },
        );
        assert_eq!(effect, Effect::None);
        assert!(app.alert.is_none());
        assert!(app.history.is_empty());
        assert!(!app.is_loading());
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut app = app_with_history(&[("first", &["a"])]);

        // Confirming without a pending prompt does nothing
        assert_eq!(update(&mut app, Action::ConfirmClear), Effect::None);
        assert_eq!(app.history.len(), 1);

        update(&mut app, Action::RequestClear);
        assert!(app.confirm_clear);
        update(&mut app, Action::CancelClear);
        assert!(!app.confirm_clear);
        assert_eq!(app.history.len(), 1);

        update(&mut app, Action::RequestClear);
        assert_eq!(update(&mut app, Action::ConfirmClear), Effect::RemovePersisted);
        assert!(app.history.is_empty());
        assert!(!app.confirm_clear);
    }

    #[test]
    fn test_clear_not_offered_on_empty_history() {
        let mut app = test_app();
        update(&mut app, Action::RequestClear);
        assert!(!app.confirm_clear);
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
