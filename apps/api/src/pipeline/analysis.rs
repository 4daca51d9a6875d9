//! Analysis phase — derives the expertise and voice profiles that steer
//! every downstream generation call.

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, MAX_TOKENS_CREATIVE};
use crate::pipeline::prompts::{
    ANALYST_SYSTEM, EXPERTISE_PROMPT_TEMPLATE, LINGUIST_SYSTEM, TONE_PROMPT_TEMPLATE,
};

/// Prompt budgets: inputs are truncated to these prefixes before analysis.
/// Lossy for long inputs; the cap bounds cost and latency.
pub const EXPERTISE_PROMPT_BUDGET: usize = 20_000;
pub const TONE_PROMPT_BUDGET: usize = 10_000;

/// Semantic profiles derived once per run and shared read-only by every
/// downstream generation call. Raw model text, deliberately unparsed.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisProfile {
    pub expertise_summary: String,
    pub tone_profile: String,
}

/// Issues the two independent profile calls. There is no ordering dependency
/// between them, so they run concurrently.
pub async fn analyze_inputs(
    llm: &LlmClient,
    expertise_text: &str,
    tone_text: &str,
) -> Result<AnalysisProfile, AppError> {
    info!("Phase 1: analyzing inputs");

    let expertise_prompt = EXPERTISE_PROMPT_TEMPLATE.replace(
        "{expertise}",
        truncate_chars(expertise_text, EXPERTISE_PROMPT_BUDGET),
    );
    let tone_prompt =
        TONE_PROMPT_TEMPLATE.replace("{tone}", truncate_chars(tone_text, TONE_PROMPT_BUDGET));

    let (expertise_summary, tone_profile) = tokio::try_join!(
        llm.generate(ANALYST_SYSTEM, &expertise_prompt, MAX_TOKENS_CREATIVE),
        llm.generate(LINGUIST_SYSTEM, &tone_prompt, MAX_TOKENS_CREATIVE),
    )
    .map_err(|e| AppError::Llm(format!("input analysis failed: {e}")))?;

    Ok(AnalysisProfile {
        expertise_summary,
        tone_profile,
    })
}

/// Truncates to at most `max` characters without splitting a code point.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
