//! CodeArena · Coding-Challenge Platform Backend
//!
//! - Axum HTTP + WebSocket API
//! - Remote code judging via a Judge0-compatible service (env-configured)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   JUDGE_API_KEY       : enables the remote judge if present
//!   JUDGE_BASE_URL      : default "https://judge0-ce.p.rapidapi.com"
//!   JUDGE_API_HOST      : default "judge0-ce.p.rapidapi.com"
//!   JUDGE_LANGUAGE_ID   : default 62 (Java)
//!   CHALLENGE_BANK_PATH : path to TOML challenge bank
//!   DATA_DIR            : directory for store snapshots (off when unset)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod seeds;
mod persist;
mod progress;
mod leaderboard;
mod achievements;
mod comments;
mod session;
mod state;
mod protocol;
mod reconcile;
mod logic;
mod judge;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (catalog, stores, judge client).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "codearena_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
