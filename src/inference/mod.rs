mod error;
mod fallback;
mod http;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

pub use error::{ProviderError, ProviderErrorKind};
pub use fallback::{complete, Attempt, Completion};
pub use http::{HttpChatBackend, DEFAULT_BASE_URL};

/// Candidate models, tried in order until one answers.
pub const DEFAULT_MODELS: [&str; 3] = [
    "deepseek-ai/DeepSeek-V3-0324",
    "Qwen/Qwen2.5-7B-Instruct",
    "meta-llama/Llama-3.2-3B-Instruct",
];

/// Generation budget for every request.
pub const MAX_OUTPUT_TOKENS: u32 = 2500;

/// A single non-streaming chat completion against one model.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat_completion(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, ProviderError>;
}
