//! Derivative asset fan-out — LinkedIn posts and nurture emails.
//!
//! Calls are independent and run sequentially; each asset is persisted as it
//! is produced. A failed asset is skipped with a warning, never fatal to the
//! run.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{LlmClient, MAX_TOKENS_CREATIVE};
use crate::output::RunContext;
use crate::pipeline::analysis::AnalysisProfile;
use crate::pipeline::prompts::{
    EMAIL_PROMPT_TEMPLATE, EMAIL_SYSTEM, LINKEDIN_PROMPT_TEMPLATE, LINKEDIN_SYSTEM,
};

const POST_VARIANTS: usize = 2;
const EMAIL_VARIANTS: usize = 2;

/// Editorial angle of a LinkedIn post variant. The mapping is fixed:
/// variant 0 is always contrarian, variant 1 always educational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAngle {
    Contrarian,
    Educational,
}

impl PostAngle {
    fn for_variant(variant: usize) -> Self {
        if variant == 0 {
            PostAngle::Contrarian
        } else {
            PostAngle::Educational
        }
    }

    fn directive(self) -> &'static str {
        match self {
            PostAngle::Contrarian => "Contrarian/Provocative",
            PostAngle::Educational => "Educational/How-to",
        }
    }
}

/// Goal of a nurture email variant. Variant 0 is always story-driven,
/// variant 1 always framework-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailGoal {
    StoryDriven,
    ActionableFramework,
}

impl EmailGoal {
    fn for_variant(variant: usize) -> Self {
        if variant == 0 {
            EmailGoal::StoryDriven
        } else {
            EmailGoal::ActionableFramework
        }
    }

    fn directive(self) -> &'static str {
        match self {
            EmailGoal::StoryDriven => "Story-driven",
            EmailGoal::ActionableFramework => "Actionable Framework",
        }
    }
}

/// Generates the fixed set of derivative assets and returns them keyed by
/// logical filename.
pub async fn create_social_assets(
    llm: &LlmClient,
    run: &RunContext,
    profile: &AnalysisProfile,
) -> Result<BTreeMap<String, String>, AppError> {
    info!("Phase 3 & 4: creating social assets");
    let mut assets = BTreeMap::new();

    for variant in 0..POST_VARIANTS {
        let prompt = LINKEDIN_PROMPT_TEMPLATE
            .replace("{number}", &(variant + 1).to_string())
            .replace("{expertise}", &profile.expertise_summary)
            .replace("{tone}", &profile.tone_profile)
            .replace("{focus}", PostAngle::for_variant(variant).directive());
        let name = format!("linkedin_post_{}.txt", variant + 1);

        match llm.generate(LINKEDIN_SYSTEM, &prompt, MAX_TOKENS_CREATIVE).await {
            Ok(post) => {
                run.persist(&name, &post).await?;
                assets.insert(name, post);
            }
            Err(e) => warn!("skipping {name}: {e}"),
        }
    }

    for variant in 0..EMAIL_VARIANTS {
        let prompt = EMAIL_PROMPT_TEMPLATE
            .replace("{number}", &(variant + 1).to_string())
            .replace("{expertise}", &profile.expertise_summary)
            .replace("{tone}", &profile.tone_profile)
            .replace("{goal}", EmailGoal::for_variant(variant).directive());
        let name = format!("nurture_email_{}.txt", variant + 1);

        match llm.generate(EMAIL_SYSTEM, &prompt, MAX_TOKENS_CREATIVE).await {
            Ok(email) => {
                run.persist(&name, &email).await?;
                assets.insert(name, email);
            }
            Err(e) => warn!("skipping {name}: {e}"),
        }
    }

    Ok(assets)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::llm_client::testing::{client_with, StubReply};
    use crate::output::RunContext;

    fn profile() -> AnalysisProfile {
        AnalysisProfile {
            expertise_summary: "agentic search expertise".to_string(),
            tone_profile: "punchy and contrarian".to_string(),
        }
    }

    #[tokio::test]
    async fn variant_directives_are_deterministic() {
        let prompts: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&prompts);
        let (llm, _backend) = client_with(move |_, _, user| {
            seen.lock().unwrap().push(user.to_string());
            StubReply::Text("asset content".to_string())
        });
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::create(root.path()).await.unwrap();

        let assets = create_social_assets(&llm, &run, &profile()).await.unwrap();

        assert_eq!(assets.len(), 4);
        let prompts = prompts.lock().unwrap();
        assert!(prompts[0].contains("Contrarian/Provocative"));
        assert!(prompts[1].contains("Educational/How-to"));
        assert!(prompts[2].contains("Story-driven"));
        assert!(prompts[3].contains("Actionable Framework"));
    }

    #[tokio::test]
    async fn assets_are_persisted_under_their_logical_names() {
        let (llm, _backend) = client_with(|_, _, _| StubReply::Text("asset content".to_string()));
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::create(root.path()).await.unwrap();

        let assets = create_social_assets(&llm, &run, &profile()).await.unwrap();

        for name in [
            "linkedin_post_1.txt",
            "linkedin_post_2.txt",
            "nurture_email_1.txt",
            "nurture_email_2.txt",
        ] {
            assert!(assets.contains_key(name), "missing asset {name}");
            assert!(run.dir().join(name).exists(), "missing file {name}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn a_failed_asset_is_skipped_not_fatal() {
        let (llm, _backend) = client_with(|_, _, user| {
            if user.contains("LinkedIn Post #1") {
                StubReply::Fail("backend down".to_string())
            } else {
                StubReply::Text("asset content".to_string())
            }
        });
        let root = tempfile::tempdir().unwrap();
        let run = RunContext::create(root.path()).await.unwrap();

        let assets = create_social_assets(&llm, &run, &profile()).await.unwrap();

        assert_eq!(assets.len(), 3);
        assert!(!assets.contains_key("linkedin_post_1.txt"));
        assert!(assets.contains_key("linkedin_post_2.txt"));
    }
}
