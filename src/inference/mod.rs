pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{CompletionProvider, ProviderError};
pub use providers::{ChatCompletionsProvider, EndpointOptions, build_provider};
pub use types::*;
