use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/skills", get(skills))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub skills: usize,
}

#[derive(Debug, Serialize)]
pub struct SkillsResponse {
    pub skills: Vec<String>,
    pub match_mode: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.parser.model_name().to_string(),
        skills: state.parser.skills().vocabulary().len(),
    })
}

async fn skills(State(state): State<AppState>) -> Json<SkillsResponse> {
    let matcher = state.parser.skills();
    Json(SkillsResponse {
        skills: matcher.vocabulary().entries().to_vec(),
        match_mode: matcher.mode().to_string(),
    })
}
