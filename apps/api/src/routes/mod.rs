pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers as pipeline_handlers;
use crate::research::handlers as research_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/generate", post(pipeline_handlers::handle_generate))
        .route("/api/v1/visuals", post(pipeline_handlers::handle_visuals))
        .route("/api/v1/research", post(research_handlers::handle_research))
        .with_state(state)
}
