//! Deep research — an ordered fallback chain over research-capable models.
//!
//! Each candidate model gets a search-grounded attempt and then a plain
//! attempt before the chain advances. Research is optional enrichment, so
//! total exhaustion degrades to an error-describing string, never a failure.

pub mod gemini;
pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::output::RunContext;
use crate::research::prompts::RESEARCH_PROMPT_TEMPLATE;

/// Candidate model identifiers in decreasing order of preference.
pub const RESEARCH_MODELS: &[&str] = &[
    "gemini-flash-latest",
    "gemini-1.5-flash-latest",
    "gemini-1.5-flash",
];

#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned no text content")]
    EmptyContent,
}

/// A backend capable of tool-augmented and plain generation, addressed by
/// model identifier. The fallback chain walks candidates through this seam.
#[async_trait]
pub trait ResearchBackend: Send + Sync {
    /// Generation with search grounding enabled.
    async fn generate_with_search(&self, model: &str, prompt: &str)
        -> Result<String, ResearchError>;

    /// Plain generation on the same model, used when the tool attempt fails.
    async fn generate_plain(&self, model: &str, prompt: &str) -> Result<String, ResearchError>;
}

/// Researches `topic`, walking the candidate models in order until one
/// attempt returns text. The persisted filename records whether the winning
/// attempt was search-grounded or the plain fallback.
pub async fn deep_research(backend: &dyn ResearchBackend, run: &RunContext, topic: &str) -> String {
    info!("performing deep research on: {topic}");
    let prompt = RESEARCH_PROMPT_TEMPLATE.replace("{topic}", topic);

    let mut last_error: Option<ResearchError> = None;

    for model in RESEARCH_MODELS {
        info!("attempting deep research with model: {model}");

        match backend.generate_with_search(model, &prompt).await {
            Ok(report) => {
                let name = format!("deep_research_{}.md", Utc::now().timestamp());
                save_report(run, &name, &report).await;
                return report;
            }
            Err(e) => {
                warn!("search-grounded attempt on {model} failed: {e}; retrying without tools");
                last_error = Some(e);
            }
        }

        match backend.generate_plain(model, &prompt).await {
            Ok(report) => {
                let name = format!("deep_research_fallback_{}.md", Utc::now().timestamp());
                save_report(run, &name, &report).await;
                return report;
            }
            Err(e) => {
                warn!("plain attempt on {model} failed: {e}");
                last_error = Some(e);
            }
        }
    }

    let last = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no research models configured".to_string());
    format!("Error: All research models failed. Last error: {last}")
}

/// Research output is best-effort: a failed write never discards the report.
async fn save_report(run: &RunContext, name: &str, content: &str) {
    if let Err(e) = run.persist(name, content).await {
        warn!("failed to persist research report {name}: {e}");
    }
}
