use crate::config::Config;
use crate::error::AppError;
use crate::tailor::TailorEngine;
use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Arc<Config>,
    pub engine: TailorEngine,
}

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/tailor", post(handle_tailor))
        .with_state(state)
}

async fn handle_index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

async fn handle_health(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.config.llm.model,
    }))
}

/// Fields are optional at the wire level so an absent field surfaces as the
/// validation error rather than a body-deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TailorBody {
    #[serde(default)]
    resume: Option<String>,
    #[serde(default)]
    job_description: Option<String>,
}

#[derive(Debug, Serialize)]
struct TailorResponse {
    result: String,
}

#[instrument(skip(state, body), fields(request_id = %Uuid::new_v4()))]
async fn handle_tailor(
    State(state): State<SharedState>,
    Json(body): Json<TailorBody>,
) -> Result<Json<TailorResponse>, AppError> {
    let resume = body.resume.as_deref().unwrap_or("");
    let job_description = body.job_description.as_deref().unwrap_or("");

    info!(
        resume_chars = resume.len(),
        job_chars = job_description.len(),
        "Tailor request received"
    );

    let result = state.engine.tailor(resume, job_description).await?;

    Ok(Json(TailorResponse { result }))
}
