//! Axum route handler for deep research.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::output::RunContext;
use crate::pipeline::handlers::check_password;
use crate::research::deep_research;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    pub password: String,
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct ResearchResponse {
    pub status: String,
    pub research: String,
}

/// POST /api/v1/research
///
/// Degrade-to-message endpoint: an unconfigured backend or an exhausted
/// fallback chain returns a descriptive string, not an error status.
pub async fn handle_research(
    State(state): State<AppState>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<ResearchResponse>, AppError> {
    check_password(&state, &request.password)?;
    if request.topic.trim().is_empty() {
        return Err(AppError::Validation("topic cannot be empty".to_string()));
    }

    let Some(backend) = &state.research else {
        return Ok(Json(ResearchResponse {
            status: "success".to_string(),
            research: "Error: GOOGLE_API_KEY not configured.".to_string(),
        }));
    };

    let run = RunContext::create(&state.config.output_dir).await?;
    let research = deep_research(backend.as_ref(), &run, &request.topic).await;

    Ok(Json(ResearchResponse {
        status: "success".to_string(),
        research,
    }))
}
