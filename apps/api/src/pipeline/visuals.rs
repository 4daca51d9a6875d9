//! Visual concept generation — turns a social post into illustration-ready
//! concepts, each with an image-generation prompt and an SVG sketch.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError, MAX_TOKENS_CREATIVE};
use crate::output::RunContext;
use crate::pipeline::prompts::{VISUAL_PROMPT_TEMPLATE, VISUAL_SYSTEM};

/// Logical name of the combined concept listing within a run.
pub const CONCEPTS_FILENAME: &str = "visual_concepts.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualConcept {
    pub title: String,
    pub rationale: String,
    pub image_prompt: String,
    pub svg_code: String,
}

/// Generates visual concepts for a post and persists them: the full listing
/// as JSON plus one `.svg` file per concept. A malformed model response
/// degrades to a single placeholder concept, so callers always get something
/// renderable.
pub async fn generate_visual_concepts(
    llm: &LlmClient,
    run: &RunContext,
    post_text: &str,
) -> Result<Vec<VisualConcept>, AppError> {
    info!("generating visual concepts");

    let prompt = VISUAL_PROMPT_TEMPLATE.replace("{post_text}", post_text);
    let concepts = match llm
        .generate_json::<Vec<VisualConcept>>(VISUAL_SYSTEM, &prompt, MAX_TOKENS_CREATIVE)
        .await
    {
        Ok(concepts) => concepts,
        Err(LlmError::Extract(e)) => {
            warn!("visual concept parsing failed: {e}");
            return Ok(vec![fallback_concept(&e.to_string())]);
        }
        Err(e) => {
            return Err(AppError::Llm(format!(
                "visual concept generation failed: {e}"
            )))
        }
    };

    let listing = serde_json::to_string_pretty(&concepts)
        .map_err(|e| AppError::Internal(anyhow!("failed to serialize concepts: {e}")))?;
    run.persist(CONCEPTS_FILENAME, &listing).await?;

    for (i, concept) in concepts.iter().enumerate() {
        let name = format!("visual_{}_{}.svg", i + 1, slugify(&concept.title));
        run.persist(&name, &concept.svg_code).await?;
    }

    Ok(concepts)
}

fn fallback_concept(error: &str) -> VisualConcept {
    VisualConcept {
        title: "Error Generating Visuals".to_string(),
        rationale: "The model failed to produce valid JSON.".to_string(),
        image_prompt: "Error".to_string(),
        svg_code: format!(
            "<svg viewBox='0 0 800 800' xmlns='http://www.w3.org/2000/svg'>\
             <text x='50%' y='50%' dominant-baseline='middle' text-anchor='middle' \
             fill='white'>Generation Failed: {error}</text></svg>"
        ),
    }
}

/// Filesystem-safe slug: keeps alphanumerics, spaces, dashes and
/// underscores, then lowercases and joins words on underscores.
fn slugify(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .replace(' ', "_")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{client_with, StubReply};
    use crate::output::RunContext;

    const CONCEPTS_JSON: &str = r#"[
        {
            "title": "The Contrarian Chart",
            "rationale": "Stops the scroll",
            "image_prompt": "a bold line chart breaking upward",
            "svg_code": "<svg viewBox='0 0 800 800'></svg>"
        },
        {
            "title": "Before / After",
            "rationale": "Shows the shift",
            "image_prompt": "split-screen comparison",
            "svg_code": "<svg viewBox='0 0 800 800'></svg>"
        }
    ]"#;

    #[test]
    fn slugify_strips_punctuation_and_lowercases() {
        assert_eq!(slugify("The Contrarian Chart!"), "the_contrarian_chart");
        assert_eq!(slugify("Before / After"), "before__after");
        assert_eq!(slugify("  padded  "), "padded");
    }

    #[tokio::test]
    async fn concepts_and_svgs_are_persisted() {
        let (llm, _backend) =
            client_with(|_, _, _| StubReply::Text(format!("```json\n{CONCEPTS_JSON}\n```")));
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::create(root.path()).await.unwrap();

        let concepts = generate_visual_concepts(&llm, &run, "post text").await.unwrap();

        assert_eq!(concepts.len(), 2);
        assert!(run.dir().join(CONCEPTS_FILENAME).exists());
        assert!(run.dir().join("visual_1_the_contrarian_chart.svg").exists());
    }

    #[tokio::test]
    async fn malformed_output_degrades_to_a_placeholder_concept() {
        let (llm, _backend) =
            client_with(|_, _, _| StubReply::Text("sorry, no JSON today".to_string()));
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::create(root.path()).await.unwrap();

        let concepts = generate_visual_concepts(&llm, &run, "post text").await.unwrap();

        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].title, "Error Generating Visuals");
        assert!(concepts[0].svg_code.contains("Generation Failed"));
    }
}
