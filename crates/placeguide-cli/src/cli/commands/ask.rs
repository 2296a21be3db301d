//! `placeguide ask` / `placeguide query` – answer text from the generative provider.

use anyhow::{Context, Result};
use placeguide_core::config::GuideConfig;
use placeguide_core::generate::{GeminiClient, TextGenerator};

/// Which prompt the user filled in. Both go to the same model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskKind {
    Question,
    Query,
}

impl AskKind {
    pub fn empty_input_warning(self) -> &'static str {
        match self {
            AskKind::Question => "Please enter a question before asking for an answer.",
            AskKind::Query => "Please enter a query before asking for a response.",
        }
    }
}

pub async fn run_ask(cfg: &GuideConfig, text: &str, kind: AskKind) -> Result<()> {
    if text.trim().is_empty() {
        eprintln!("warning: {}", kind.empty_input_warning());
        return Ok(());
    }

    let client = GeminiClient::from_config(&cfg.generative)?;
    tracing::info!(model = client.model(), ?kind, "generating response");
    let prompt = text.to_string();
    let answer = tokio::task::spawn_blocking(move || client.generate(&prompt))
        .await
        .context("generation task join")?
        .context("generating response")?;

    println!("## Chatbot Response");
    println!();
    println!("{}", answer);
    Ok(())
}
