//! HTTP endpoint handlers. These are thin wrappers that forward to the generator.
//! Each handler is instrumented and logs basic result info.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use tracing::{info, instrument, warn};

use crate::error::{QuizError, QuizResult};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthOut { ok: true, ai_configured: state.generator.ai.is_configured() })
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_generate_questions(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateIn>, JsonRejection>,
) -> QuizResult<Json<GenerateOut>> {
    let Json(body) = payload.map_err(|e| {
        warn!(target: "quiz", error = %e, "Rejected request body");
        QuizError::input(format!("Invalid request body: {}", e.body_text()))
    })?;

    let topic_in = body.topic.ok_or_else(|| QuizError::input("Topic is required"))?;
    let topic = topic_in.into_topic().ok_or_else(|| QuizError::input("Topic title is required"))?;

    match state.generator.generate(&topic).await {
        Ok(questions) => {
            info!(target: "quiz", title = %topic.title, count = questions.len(), "HTTP questions served");
            Ok(Json(GenerateOut { questions }))
        }
        Err(e) => {
            warn!(target: "quiz", title = %topic.title, kind = e.kind(), error = %e, "HTTP question generation failed");
            Err(e)
        }
    }
}
