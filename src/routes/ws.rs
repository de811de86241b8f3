//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;
use crate::util::trunc_for_log;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "numbersense_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "numbersense_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target = "numbersense_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => {
            error!(target: "numbersense_backend", error = %e, raw = %trunc_for_log(&txt, 120), "WS invalid JSON");
            ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }
          }
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "numbersense_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "numbersense_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::StartRound { mode } => {
      let started = start_round(state, mode).await;
      tracing::info!(target: "round", id = %started.session.id, ?mode, "WS round started");
      ServerWsMessage::RoundStarted { session: started.session, best: started.best }
    }

    ClientWsMessage::SubmitAnswer { session_id, answer } => {
      match submit_answer(state, &session_id, &answer).await {
        Some(out) => {
          tracing::info!(target: "question", id = %session_id, status = ?out.status, "WS answer evaluated");
          ServerWsMessage::AnswerResult(out)
        }
        None => ServerWsMessage::Error { message: format!("Unknown or finished round: {}", session_id) },
      }
    }

    ClientWsMessage::EndRound { session_id, reason } => {
      match end_round(state, &session_id, reason).await {
        Some(summary) => {
          tracing::info!(target: "round", id = %session_id, ?reason, "WS round ended");
          ServerWsMessage::RoundEnded(summary)
        }
        None => ServerWsMessage::Error { message: format!("Unknown session: {}", session_id) },
      }
    }

    ClientWsMessage::SwitchMode { session_id, mode } => {
      match switch_mode(state, &session_id, mode).await {
        Some(out) => ServerWsMessage::ModeSwitched { session: out.session, best: out.best },
        None => ServerWsMessage::Error { message: format!("Unknown session: {}", session_id) },
      }
    }

    ClientWsMessage::BestScore { mode } => {
      let out = best_score(state, mode).await;
      ServerWsMessage::BestScore { mode, best: out.best }
    }

    ClientWsMessage::ResetBest { mode } => {
      let out = reset_best(state, mode).await;
      ServerWsMessage::BestScore { mode, best: out.best }
    }
  }
}
