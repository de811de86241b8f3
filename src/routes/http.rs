//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; unknown session ids map to 404.

use std::sync::Arc;

use axum::{
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

fn not_found(message: &str) -> (StatusCode, Json<serde_json::Value>) {
  (StatusCode::NOT_FOUND, Json(serde_json::json!({ "message": message })))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info")]
pub async fn http_get_modes() -> impl IntoResponse { Json(list_modes()) }

#[instrument(level = "info", skip(state, body), fields(mode = ?body.mode))]
pub async fn http_start_round(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartRoundIn>,
) -> impl IntoResponse {
  let started = start_round(&state, body.mode).await;
  info!(target: "round", id = %started.session.id, "HTTP round started");
  Json(started)
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id, answer_len = body.answer.len()))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswerIn>,
) -> impl IntoResponse {
  match submit_answer(&state, &body.session_id, &body.answer).await {
    Some(out) => Json(out).into_response(),
    None => not_found("Unknown or finished round").into_response(),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id, reason = ?body.reason))]
pub async fn http_end_round(
  State(state): State<Arc<AppState>>,
  Json(body): Json<EndRoundIn>,
) -> impl IntoResponse {
  match end_round(&state, &body.session_id, body.reason).await {
    Some(summary) => Json(summary).into_response(),
    None => not_found("Unknown session").into_response(),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id, mode = ?body.mode))]
pub async fn http_switch_mode(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SwitchModeIn>,
) -> impl IntoResponse {
  match switch_mode(&state, &body.session_id, body.mode).await {
    Some(out) => Json(out).into_response(),
    None => not_found("Unknown session").into_response(),
  }
}

#[instrument(level = "info", skip(state), fields(%q.session_id))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SessionQuery>,
) -> impl IntoResponse {
  match get_session(&state, &q.session_id).await {
    Some(session) => Json(session).into_response(),
    None => not_found("Unknown session").into_response(),
  }
}

#[instrument(level = "info", skip(state), fields(mode = ?q.mode))]
pub async fn http_get_best(
  State(state): State<Arc<AppState>>,
  Query(q): Query<BestQuery>,
) -> impl IntoResponse {
  Json(best_score(&state, q.mode).await)
}

#[instrument(level = "info", skip(state, body), fields(mode = ?body.mode))]
pub async fn http_reset_best(
  State(state): State<Arc<AppState>>,
  Json(body): Json<BestQuery>,
) -> impl IntoResponse {
  Json(reset_best(&state, body.mode).await)
}
