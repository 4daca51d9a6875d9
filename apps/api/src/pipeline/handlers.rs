//! Axum route handlers for the content pipeline.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::output::RunContext;
use crate::pipeline::visuals::{generate_visual_concepts, VisualConcept};
use crate::pipeline::run_pipeline;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub password: String,
    pub expertise: String,
    pub tone: String,
    /// Optional manual research source (file path, URL, or literal text).
    #[serde(default)]
    pub research: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: String,
    pub run_id: String,
    pub assets: BTreeMap<String, String>,
}

/// POST /api/v1/generate
///
/// Full pipeline: ingest → analyze → long-form guide → posts and emails.
/// Synchronous from the caller's view; a run can take minutes.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    check_password(&state, &request.password)?;
    if request.expertise.trim().is_empty() || request.tone.trim().is_empty() {
        return Err(AppError::Validation(
            "expertise and tone are required".to_string(),
        ));
    }

    let run = RunContext::create(&state.config.output_dir).await?;
    let outcome = run_pipeline(
        &state.llm,
        &run,
        &request.expertise,
        &request.tone,
        request.research.as_deref(),
    )
    .await?;

    Ok(Json(GenerateResponse {
        status: "success".to_string(),
        run_id: outcome.run_id,
        assets: outcome.assets,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VisualsRequest {
    pub password: String,
    pub post_text: String,
}

#[derive(Debug, Serialize)]
pub struct VisualsResponse {
    pub status: String,
    pub run_id: String,
    pub concepts: Vec<VisualConcept>,
}

/// POST /api/v1/visuals
///
/// Generates visual concepts for a social post and persists them under a
/// fresh run.
pub async fn handle_visuals(
    State(state): State<AppState>,
    Json(request): Json<VisualsRequest>,
) -> Result<Json<VisualsResponse>, AppError> {
    check_password(&state, &request.password)?;
    if request.post_text.trim().is_empty() {
        return Err(AppError::Validation("post_text cannot be empty".to_string()));
    }

    let run = RunContext::create(&state.config.output_dir).await?;
    let concepts = generate_visual_concepts(&state.llm, &run, &request.post_text).await?;

    Ok(Json(VisualsResponse {
        status: "success".to_string(),
        run_id: run.run_id().to_string(),
        concepts,
    }))
}

/// Shared-secret check used by every mutating endpoint.
pub(crate) fn check_password(state: &AppState, password: &str) -> Result<(), AppError> {
    if password != state.config.api_password {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}
