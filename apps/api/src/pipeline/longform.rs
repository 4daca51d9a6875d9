//! Long-form orchestrator — plans an outline, writes the introduction, fans
//! out section writing against a bounded pool, then reassembles the document
//! in outline order and persists it.
//!
//! Flow: PLAN → (parse outline; abandon on failure) → INTRO →
//!       SECTIONS (fan-out, fan-in) → CONCLUSION → ASSEMBLE → PERSIST.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::extract::extract_as;
use crate::llm_client::{LlmClient, LlmError, MAX_TOKENS_CREATIVE, MAX_TOKENS_STRUCTURED};
use crate::output::RunContext;
use crate::pipeline::analysis::AnalysisProfile;
use crate::pipeline::prompts::{
    CONCLUSION_PROMPT_TEMPLATE, INTRO_PROMPT_TEMPLATE, OUTLINE_PROMPT_TEMPLATE,
    SECTION_PROMPT_TEMPLATE, STRATEGIST_SYSTEM, WRITER_SYSTEM,
};
use crate::pipeline::ResearchContext;

/// Logical name of the assembled document within a run.
pub const GUIDE_FILENAME: &str = "resource_guide.md";

/// Cap on in-flight section-writing calls.
const SECTION_CONCURRENCY: usize = 5;

/// Structured plan for the guide. Section order is significant: it defines
/// section numbering and final document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    pub intro_hook: String,
    pub sections: Vec<OutlineSection>,
    pub conclusion_theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineSection {
    pub title: String,
    pub key_points: Vec<String>,
}

/// Runs the full long-form flow and persists the document.
///
/// Returns `Ok(None)` when the outline cannot be parsed: the document is
/// abandoned without failing the run. Any section failure aborts the whole
/// document: no partial documents with missing sections.
pub async fn create_long_form(
    llm: &LlmClient,
    run: &RunContext,
    profile: &AnalysisProfile,
    research: &ResearchContext,
) -> Result<Option<String>, AppError> {
    info!("Phase 2: creating long-form resource");

    let Some(outline) = plan_outline(llm, profile, research).await? else {
        return Ok(None);
    };

    let intro = write_intro(llm, &outline, profile).await?;

    info!("writing {} sections in parallel", outline.sections.len());
    let section_bodies = write_sections(llm, &outline, profile).await?;

    let conclusion = write_conclusion(llm, &outline, profile).await?;

    let document = assemble(&outline, &intro, &section_bodies, &conclusion);
    run.persist(GUIDE_FILENAME, &document).await?;

    Ok(Some(document))
}

/// PLAN: one structured-extraction call. A transport failure propagates; a
/// malformed or empty outline abandons the document.
async fn plan_outline(
    llm: &LlmClient,
    profile: &AnalysisProfile,
    research: &ResearchContext,
) -> Result<Option<Outline>, AppError> {
    let prompt = OUTLINE_PROMPT_TEMPLATE
        .replace("{expertise}", &profile.expertise_summary)
        .replace("{research}", &research.summary);

    let raw = llm
        .generate(STRATEGIST_SYSTEM, &prompt, MAX_TOKENS_STRUCTURED)
        .await
        .map_err(|e| AppError::Llm(format!("outline planning failed: {e}")))?;

    match extract_as::<Outline>(&raw) {
        Ok(outline) if outline.sections.is_empty() => {
            warn!("outline has no sections, abandoning document");
            Ok(None)
        }
        Ok(outline) => Ok(Some(outline)),
        Err(e) => {
            warn!("outline parsing failed, abandoning document: {e}");
            Ok(None)
        }
    }
}

async fn write_intro(
    llm: &LlmClient,
    outline: &Outline,
    profile: &AnalysisProfile,
) -> Result<String, AppError> {
    let prompt = INTRO_PROMPT_TEMPLATE
        .replace("{title}", &outline.title)
        .replace("{hook}", &outline.intro_hook)
        .replace("{tone}", &profile.tone_profile);

    llm.generate(WRITER_SYSTEM, &prompt, MAX_TOKENS_CREATIVE)
        .await
        .map_err(|e| AppError::Llm(format!("introduction writing failed: {e}")))
}

/// SECTIONS: one task per outline section against a bounded pool. Results
/// are harvested in completion order and re-sorted by section index;
/// document order must never depend on completion order.
async fn write_sections(
    llm: &LlmClient,
    outline: &Outline,
    profile: &AnalysisProfile,
) -> Result<Vec<String>, AppError> {
    let limiter = Arc::new(Semaphore::new(SECTION_CONCURRENCY));
    let mut tasks = JoinSet::new();

    for (index, section) in outline.sections.iter().enumerate() {
        let prompt = section_prompt(index, section, profile);
        let llm = llm.clone();
        let limiter = Arc::clone(&limiter);
        tasks.spawn(async move {
            let _permit = limiter
                .acquire_owned()
                .await
                .expect("section limiter closed");
            let body = llm.generate(WRITER_SYSTEM, &prompt, MAX_TOKENS_CREATIVE).await?;
            Ok::<_, LlmError>((index, body))
        });
    }

    // Fan-in on this task only; the BTreeMap restores outline order.
    // An early return drops the set and aborts the in-flight siblings.
    let mut bodies = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, body) = joined
            .map_err(|e| AppError::Internal(anyhow!("section task failed to join: {e}")))?
            .map_err(|e| AppError::Llm(format!("section writing failed: {e}")))?;
        bodies.insert(index, body);
    }

    Ok(bodies.into_values().collect())
}

fn section_prompt(index: usize, section: &OutlineSection, profile: &AnalysisProfile) -> String {
    let key_points = section
        .key_points
        .iter()
        .map(|point| format!("- {point}"))
        .collect::<Vec<_>>()
        .join("\n");

    SECTION_PROMPT_TEMPLATE
        .replace("{number}", &(index + 1).to_string())
        .replace("{title}", &section.title)
        .replace("{key_points}", &key_points)
        .replace("{tone}", &profile.tone_profile)
        .replace("{expertise}", &profile.expertise_summary)
}

async fn write_conclusion(
    llm: &LlmClient,
    outline: &Outline,
    profile: &AnalysisProfile,
) -> Result<String, AppError> {
    let prompt = CONCLUSION_PROMPT_TEMPLATE
        .replace("{title}", &outline.title)
        .replace("{theme}", &outline.conclusion_theme)
        .replace("{tone}", &profile.tone_profile);

    llm.generate(WRITER_SYSTEM, &prompt, MAX_TOKENS_CREATIVE)
        .await
        .map_err(|e| AppError::Llm(format!("conclusion writing failed: {e}")))
}

/// Deterministic assembly: title heading, intro, each section heading and
/// body by ascending index, conclusion heading and body.
fn assemble(outline: &Outline, intro: &str, section_bodies: &[String], conclusion: &str) -> String {
    let mut document = format!("# {}\n\n{}\n\n", outline.title, intro);
    for (section, body) in outline.sections.iter().zip(section_bodies) {
        document.push_str(&format!("## {}\n\n{}\n\n", section.title, body));
    }
    document.push_str(&format!("## Conclusion\n\n{conclusion}"));
    document
}
