pub mod chat_completions;

pub use chat_completions::{ChatCompletionsProvider, EndpointOptions};

use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::inference::{CompletionProvider, ProviderError};

/// Build the completion provider described by a resolved config.
pub fn build_provider(config: &ResolvedConfig) -> Result<Arc<dyn CompletionProvider>, ProviderError> {
    let provider = ChatCompletionsProvider::new(
        config.endpoint_options(),
        config.model_name.clone(),
        config.sampling,
    )?;
    Ok(Arc::new(provider))
}
