//! Runs a `Query` against the completion provider and turns the outcome
//! back into an `Action` for the reducer.

use log::info;

use crate::core::action::{Action, Query};
use crate::inference::CompletionProvider;

pub async fn perform(provider: &dyn CompletionProvider, query: Query) -> Action {
    info!("Sending {:?} to {}", query.mode, provider.name());
    match provider.complete(&query.question).await {
        Ok(raw) => Action::AnswerReceived { query, raw },
        Err(error) => Action::RequestFailed { query, error },
    }
}
