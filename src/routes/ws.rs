//! WebSocket upgrade + message loop for the interactive editor: each client
//! message is parsed as JSON and forwarded to core logic. We reply with a
//! single JSON message per request. Identity comes from a session token in
//! the upgrade query string; unauthenticated sockets may still read the
//! leaderboard but cannot run code.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    Query, State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use serde::Deserialize;
use tracing::{info, error, instrument, debug};

use crate::logic::run_submission;
use crate::protocol::{to_entry_out, to_run_out, ClientWsMessage, ServerWsMessage};
use crate::session::Identity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
  pub token: Option<String>,
}

#[instrument(level = "info", skip(ws, state, q))]
pub async fn ws_upgrade(
  ws: WebSocketUpgrade,
  Query(q): Query<WsQuery>,
  State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
  let identity = match &q.token {
    Some(token) => state.sessions.identity_for(token).await,
    None => None,
  };
  info!(target: "codearena_backend", authenticated = identity.is_some(), "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state, identity))
}

#[instrument(level = "info", skip(socket, state, identity))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>, identity: Option<Identity>) {
  info!(target: "codearena_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "codearena_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, identity.as_ref()).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "codearena_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "codearena_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(msg, state, identity))]
async fn handle_client_ws(
  msg: ClientWsMessage,
  state: &AppState,
  identity: Option<&Identity>,
) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Run { challenge_id, source_code } => {
      let Some(identity) = identity else {
        return ServerWsMessage::Error { message: "Sign in before running code.".into() };
      };
      match run_submission(state, identity, &challenge_id, &source_code).await {
        Ok(outcome) => {
          tracing::info!(target: "submission", id = %challenge_id, "WS run evaluated");
          ServerWsMessage::RunResult { result: to_run_out(outcome) }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::Leaderboard { limit } => {
      let entries = state
        .leaderboard
        .top_n(limit.unwrap_or(crate::leaderboard::DEFAULT_TOP_N))
        .await;
      ServerWsMessage::Leaderboard { entries: entries.iter().map(to_entry_out).collect() }
    }
  }
}
