//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Starting, ending, and switching rounds
//!   - Submitting answers (evaluation + mode side effects)
//!   - Best-score lookup and reset
//!
//! Handlers stay thin: they deserialize, call in here, and serialize the
//! returned DTOs.

use tracing::{info, instrument, warn};

use crate::domain::{EndReason, ModeKey};
use crate::protocol::{
  answer_to_out, mode_to_out, session_to_out, summary_to_out, AnswerOut, BestOut, ModeOut,
  SessionStateOut, SessionOut, SummaryOut,
};
use crate::state::AppState;
use crate::util::accuracy_label;

#[instrument(level = "info", skip(state), fields(?mode))]
pub async fn start_round(state: &AppState, mode: ModeKey) -> SessionStateOut {
  let session = state.start_round(mode).await;
  let best = state.best_score(mode).await;
  info!(target: "round", id = %session.id, ?mode, best, "Round delivered");
  SessionStateOut { session: session_to_out(&session), best }
}

#[instrument(level = "info", skip(state, answer), fields(%session_id, answer_len = answer.len()))]
pub async fn submit_answer(state: &AppState, session_id: &str, answer: &str) -> Option<AnswerOut> {
  match state.submit_answer(session_id, answer).await {
    Some(outcome) => {
      info!(
        target: "question",
        id = %session_id,
        status = ?outcome.evaluation.status,
        score = outcome.evaluation.stats.score,
        streak = outcome.evaluation.stats.streak,
        "Answer evaluated"
      );
      Some(answer_to_out(&outcome))
    }
    None => {
      warn!(target: "round", id = %session_id, "Answer for unknown or finished round");
      None
    }
  }
}

#[instrument(level = "info", skip(state), fields(%session_id, ?reason))]
pub async fn end_round(state: &AppState, session_id: &str, reason: EndReason) -> Option<SummaryOut> {
  let summary = state.end_round(session_id, reason).await?;
  info!(
    target: "round",
    id = %session_id,
    score = summary.stats.score,
    accuracy = %accuracy_label(summary.stats.total_correct, summary.stats.total_answered),
    "Round summary"
  );
  Some(summary_to_out(&summary))
}

/// Switch the session to another mode and report the (fresh) session along
/// with the target mode's best, so the scoreboard can repaint in one go.
#[instrument(level = "info", skip(state), fields(%session_id, ?mode))]
pub async fn switch_mode(state: &AppState, session_id: &str, mode: ModeKey) -> Option<SessionStateOut> {
  let session = state.switch_mode(session_id, mode).await?;
  let best = state.best_score(mode).await;
  Some(SessionStateOut { session: session_to_out(&session), best })
}

pub async fn get_session(state: &AppState, session_id: &str) -> Option<SessionOut> {
  state.session(session_id).await.map(|s| session_to_out(&s))
}

#[instrument(level = "info", skip(state), fields(?mode))]
pub async fn best_score(state: &AppState, mode: ModeKey) -> BestOut {
  BestOut { mode, best: state.best_score(mode).await }
}

#[instrument(level = "info", skip(state), fields(?mode))]
pub async fn reset_best(state: &AppState, mode: ModeKey) -> BestOut {
  let best = state.reset_best(mode).await;
  info!(target: "round", ?mode, "Best score reset");
  BestOut { mode, best }
}

/// Static mode table for the frontend.
pub fn list_modes() -> Vec<ModeOut> {
  vec![mode_to_out(ModeKey::Sprint), mode_to_out(ModeKey::Survival)]
}
