//! # Command-Line Subcommands
//!
//! Non-interactive front end over the same core as the TUI: every change
//! goes through `update()` and is persisted with `HistoryStore::apply`.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use chrono::{DateTime, Local};
use clap::Subcommand;
use log::info;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::history::{ConversationHistory, HistoryStore};
use crate::core::request;
use crate::core::state::App;
use crate::inference::build_provider;

const CLEAR_PROMPT: &str = "Do you wanna delete all the history? [y/N] ";

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Ask one question and print the answer
    Ask {
        question: String,
        /// Regenerate the answer of a question already in history
        #[arg(long)]
        reask: bool,
    },
    /// Print the stored history, oldest first
    History,
    /// Delete all stored history
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(command: Command, config: &ResolvedConfig) -> io::Result<ExitCode> {
    let store = HistoryStore::open_file(config.storage_dir.as_deref())?;
    let history = store.load_or_default();
    let provider = build_provider(config).map_err(io::Error::other)?;
    let mut app = App::from_config(provider, config, history);
    info!("Running subcommand {:?}", command);

    let succeeded = match command {
        Command::Ask { question, reask } => {
            ask(
                &mut app,
                &store,
                question,
                reask,
                &mut io::stdout(),
                &mut io::stderr(),
            )
            .await?
        }
        Command::History => {
            print_history(&app.history, &mut io::stdout())?;
            true
        }
        Command::Clear { yes } => clear(
            &mut app,
            &store,
            yes,
            &mut io::stdin().lock(),
            &mut io::stdout(),
        )?,
    };
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Sends one question, records the reply, and prints the answer lines.
/// Returns `Ok(false)` when nothing was recorded.
pub async fn ask(
    app: &mut App,
    store: &HistoryStore,
    question: String,
    reask: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    if reask && !app.history.entries().iter().any(|e| e.question == question) {
        writeln!(err, "No history entry asks {:?}", question)?;
        return Ok(false);
    }
    let action = if reask {
        Action::Reask(question)
    } else {
        Action::Submit(question)
    };
    let Effect::SpawnRequest(query) = update(app, action) else {
        writeln!(err, "Nothing to ask")?;
        return Ok(false);
    };

    let reply = request::perform(app.provider.as_ref(), query.clone()).await;
    if let Action::RequestFailed { error, .. } = &reply
        && !error.is_user_visible()
    {
        writeln!(err, "Request failed: {}", error)?;
    }
    let effect = update(app, reply);
    store.apply(&effect, &app.history);

    if let Some(alert) = app.alert.take() {
        writeln!(err, "{}", alert)?;
        return Ok(false);
    }
    if !matches!(effect, Effect::Persist { .. }) {
        return Ok(false);
    }

    // A fresh ask is the newest entry; a re-ask updated the matching ones in place
    let entry = app
        .history
        .newest_first()
        .find(|e| e.question == query.question);
    if let Some(entry) = entry {
        for line in &entry.answer_lines {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(true)
}

pub fn print_history(history: &ConversationHistory, out: &mut impl Write) -> io::Result<()> {
    if history.is_empty() {
        writeln!(out, "No history yet.")?;
        return Ok(());
    }
    for entry in history.entries() {
        writeln!(out, "[{}] {}", format_timestamp(entry.id), entry.question)?;
        for line in &entry.answer_lines {
            writeln!(out, "    {}", line)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Clears history after confirmation. Returns `Ok(false)` if the user declined.
pub fn clear(
    app: &mut App,
    store: &HistoryStore,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<bool> {
    if app.history.is_empty() {
        writeln!(out, "History is already empty.")?;
        return Ok(true);
    }
    update(app, Action::RequestClear);
    if !yes {
        write!(out, "{}", CLEAR_PROMPT)?;
        out.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            update(app, Action::CancelClear);
            writeln!(out, "Kept {} entries.", app.history.len())?;
            return Ok(false);
        }
    }
    let effect = update(app, Action::ConfirmClear);
    store.apply(&effect, &app.history);
    writeln!(out, "History cleared.")?;
    Ok(true)
}

/// Entry ids are Unix milliseconds.
fn format_timestamp(id: i64) -> String {
    DateTime::from_timestamp_millis(id)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| id.to_string())
}
