//! HTTP boundary for the pipeline.
//!
//! One chat route plus a health probe. Only fatal pipeline errors surface as
//! HTTP errors; every recovered failure is already folded into the response
//! body by the pipeline.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::client::Message;
use crate::pipeline::{PipelineResult, ResponsePipeline};
use crate::prompts::PROMPT_VERSION;

/// Request envelope for `POST /v1/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<Message>,
    pub user: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub prompt_version: &'static str,
}

pub fn router(pipeline: Arc<ResponsePipeline>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/chat", post(chat))
        .with_state(pipeline)
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        prompt_version: PROMPT_VERSION,
    })
}

async fn chat(
    State(pipeline): State<Arc<ResponsePipeline>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<PipelineResult>, (StatusCode, String)> {
    match pipeline.respond(&request.history, &request.user).await {
        Ok(result) => {
            info!(
                crisis = result.crisis,
                modified = result.modifications_applied,
                "chat request served"
            );
            Ok(Json(result))
        }
        Err(e) => {
            error!(error = %e, "chat request failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
