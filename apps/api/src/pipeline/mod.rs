//! Content pipeline — orchestrates ingestion, analysis, long-form writing
//! and derivative assets for one run.
//!
//! Flow: ingest expertise + tone → analyze → resolve research context →
//!       long-form guide → LinkedIn posts and nurture emails.
//!
//! A long-form abort (unparseable outline, exhausted section call) is logged
//! and the run continues with the derivative assets. Only missing required
//! input or an analysis-phase failure aborts the whole run.

pub mod analysis;
pub mod assets;
pub mod handlers;
pub mod longform;
pub mod prompts;
pub mod visuals;

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::ingest::ingest;
use crate::llm_client::LlmClient;
use crate::output::RunContext;

/// Fixed placeholder meaning "no external research". Read by the outline
/// planner like any other research summary.
pub const NO_RESEARCH_PLACEHOLDER: &str =
    "No external research provided. Rely solely on the expertise input.";

/// External research context fed to the outline planner. Read-only once
/// resolved.
#[derive(Debug, Clone)]
pub struct ResearchContext {
    pub summary: String,
}

/// Everything one pipeline invocation produced, keyed by logical filename.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub run_id: String,
    pub assets: BTreeMap<String, String>,
}

/// Runs the full pipeline for one `RunContext`. Missing required input is
/// rejected before any backend call is made.
pub async fn run_pipeline(
    llm: &LlmClient,
    run: &RunContext,
    expertise_source: &str,
    tone_source: &str,
    research_source: Option<&str>,
) -> Result<PipelineOutcome, AppError> {
    info!("starting content pipeline (run {})", run.run_id());

    let expertise = ingest(expertise_source).await;
    let tone = ingest(tone_source).await;

    if expertise.trim().is_empty() {
        return Err(AppError::Validation(
            "expertise input is empty or unreadable".to_string(),
        ));
    }
    if tone.trim().is_empty() {
        return Err(AppError::Validation(
            "tone input is empty or unreadable".to_string(),
        ));
    }

    let profile = analysis::analyze_inputs(llm, &expertise, &tone).await?;
    let research = research_context(research_source).await;

    let mut produced = BTreeMap::new();

    match longform::create_long_form(llm, run, &profile, &research).await {
        Ok(Some(document)) => {
            produced.insert(longform::GUIDE_FILENAME.to_string(), document);
        }
        Ok(None) => {}
        Err(e) => warn!("long-form document aborted: {e}"),
    }

    produced.extend(assets::create_social_assets(llm, run, &profile).await?);

    info!(
        "pipeline complete: {} assets saved under {}",
        produced.len(),
        run.dir().display()
    );

    Ok(PipelineOutcome {
        run_id: run.run_id().to_string(),
        assets: produced,
    })
}

/// Resolves the optional manual research source. Absent or blank sources
/// fall back to the fixed no-research placeholder.
pub async fn research_context(source: Option<&str>) -> ResearchContext {
    match source {
        Some(source) if !source.trim().is_empty() => {
            info!("ingesting manual research context");
            ResearchContext {
                summary: ingest(source).await,
            }
        }
        _ => ResearchContext {
            summary: NO_RESEARCH_PLACEHOLDER.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{client_with, StubReply};
    use crate::pipeline::prompts::{
        ANALYST_SYSTEM, EMAIL_SYSTEM, LINGUIST_SYSTEM, LINKEDIN_SYSTEM, STRATEGIST_SYSTEM,
        WRITER_SYSTEM,
    };

    const OUTLINE_JSON: &str = r#"{
        "title": "The Agentic Search Playbook",
        "intro_hook": "Blue links are dying",
        "sections": [
            {"title": "Answers Over Rankings", "key_points": ["optimize for AI answers"]},
            {"title": "Structure Beats Keywords", "key_points": ["schema", "sourcing"]}
        ],
        "conclusion_theme": "Act before the shift completes"
    }"#;

    /// Scripted backend covering every persona the full pipeline exercises.
    fn scripted() -> (crate::llm_client::LlmClient, std::sync::Arc<crate::llm_client::testing::ScriptedBackend>) {
        client_with(|_, system, user| {
            let reply = match system {
                s if s == ANALYST_SYSTEM => "EXPERTISE-ANALYSIS",
                s if s == LINGUIST_SYSTEM => "TONE-PROFILE",
                s if s == STRATEGIST_SYSTEM => {
                    return StubReply::Text(format!("```json\n{OUTLINE_JSON}\n```"))
                }
                s if s == WRITER_SYSTEM && user.contains("introduction") => "INTRO-TEXT",
                s if s == WRITER_SYSTEM && user.contains("Section 1:") => "SECTION-ONE-BODY",
                s if s == WRITER_SYSTEM && user.contains("Section 2:") => "SECTION-TWO-BODY",
                s if s == WRITER_SYSTEM => "CONCLUSION-TEXT",
                s if s == LINKEDIN_SYSTEM => "POST-BODY",
                s if s == EMAIL_SYSTEM => "EMAIL-BODY",
                other => panic!("unexpected system prompt: {other}"),
            };
            StubReply::Text(reply.to_string())
        })
    }

    #[tokio::test(start_paused = true)]
    async fn full_run_produces_guide_posts_and_emails_under_one_run() {
        let (llm, _backend) = scripted();
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::create(root.path()).await.unwrap();

        let outcome = run_pipeline(
            &llm,
            &run,
            "Agentic search replaces blue links with AI answers.",
            "Punchy, short sentences, contrarian.",
            None,
        )
        .await
        .unwrap();

        let expected = [
            "linkedin_post_1.txt",
            "linkedin_post_2.txt",
            "nurture_email_1.txt",
            "nurture_email_2.txt",
            "resource_guide.md",
        ];
        assert_eq!(
            outcome.assets.keys().collect::<Vec<_>>(),
            expected.iter().collect::<Vec<_>>()
        );
        for name in expected {
            assert!(run.dir().join(name).exists(), "missing file {name}");
        }

        let guide = &outcome.assets["resource_guide.md"];
        let positions: Vec<usize> = [
            "# The Agentic Search Playbook",
            "INTRO-TEXT",
            "## Answers Over Rankings",
            "SECTION-ONE-BODY",
            "## Structure Beats Keywords",
            "SECTION-TWO-BODY",
            "## Conclusion",
            "CONCLUSION-TEXT",
        ]
        .iter()
        .map(|needle| guide.find(needle).expect(needle))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn empty_required_input_fails_before_any_backend_call() {
        let (llm, backend) = scripted();
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::create(root.path()).await.unwrap();

        let err = run_pipeline(&llm, &run, "", "Punchy.", None).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn an_abandoned_guide_still_yields_the_derivative_assets() {
        let (llm, _backend) = client_with(|_, system, _| {
            let reply = match system {
                s if s == STRATEGIST_SYSTEM => "no json from me",
                _ => "CONTENT",
            };
            StubReply::Text(reply.to_string())
        });
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::create(root.path()).await.unwrap();

        let outcome = run_pipeline(&llm, &run, "expertise", "tone", None).await.unwrap();

        assert!(!outcome.assets.contains_key("resource_guide.md"));
        assert_eq!(outcome.assets.len(), 4);
    }

    #[tokio::test]
    async fn absent_research_source_resolves_to_the_placeholder() {
        let context = research_context(None).await;
        assert_eq!(context.summary, NO_RESEARCH_PLACEHOLDER);

        let context = research_context(Some("  ")).await;
        assert_eq!(context.summary, NO_RESEARCH_PLACEHOLDER);
    }

    #[tokio::test]
    async fn manual_research_source_is_ingested_verbatim() {
        let context = research_context(Some("Market grew 40% YoY.")).await;
        assert_eq!(context.summary, "Market grew 40% YoY.");
    }
}
