//! Generative-text providers. Calls are made once, without retry.

mod gemini;

use crate::retry::ProviderError;

pub use gemini::{parse_response, GeminiClient};

/// Turns a free-text prompt into free-text output. Blocks the calling thread.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
