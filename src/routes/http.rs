//! HTTP endpoint handlers. These are thin wrappers that forward to core
//! logic and stores. Each handler is instrumented and logs parameters and
//! basic result info; errors become a display string at this boundary.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  Json,
};
use tracing::{info, instrument};

use crate::domain::Achievement;
use crate::judge::JudgeError;
use crate::logic::{run_submission, RunError};
use crate::protocol::*;
use crate::session::{bearer_token, Identity};
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorOut>);

fn not_found(what: &str) -> ApiError {
  (StatusCode::NOT_FOUND, Json(ErrorOut { message: format!("{what} not found") }))
}

fn bad_request(message: &str) -> ApiError {
  (StatusCode::BAD_REQUEST, Json(ErrorOut { message: message.to_string() }))
}

/// Convert an orchestration error into a response. All runs surface a
/// human-readable message; nothing is retried here.
fn run_error_response(e: RunError) -> ApiError {
  let status = match &e {
    RunError::MissingChallenge(_) => StatusCode::NOT_FOUND,
    RunError::Judge(JudgeError::Configuration) => StatusCode::SERVICE_UNAVAILABLE,
    RunError::Judge(JudgeError::Transport(_)) => StatusCode::BAD_GATEWAY,
    RunError::Judge(JudgeError::MalformedResponse(_)) => StatusCode::BAD_GATEWAY,
    RunError::PartialUpdate { .. } => StatusCode::INTERNAL_SERVER_ERROR,
  };
  (status, Json(ErrorOut { message: e.to_string() }))
}

#[instrument(level = "info")]
pub async fn http_health() -> Json<HealthOut> { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(user_id = %body.user_id))]
pub async fn http_sign_in(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SessionIn>,
) -> Json<SessionOut> {
  let (token, identity) = state.sessions.sign_in(&body.user_id, &body.email).await;
  Json(SessionOut {
    token,
    user_id: identity.user_id,
    username: identity.username,
    email: identity.email,
  })
}

#[instrument(level = "info", skip(state, headers))]
pub async fn http_sign_out(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
) -> Result<Json<HealthOut>, ApiError> {
  let token = bearer_token(&headers).ok_or_else(|| bad_request("Missing bearer token."))?;
  state.sessions.sign_out(token).await;
  Ok(Json(HealthOut { ok: true }))
}

#[instrument(level = "info", skip(state), fields(category = ?q.category, difficulty = ?q.difficulty))]
pub async fn http_list_challenges(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ChallengeListQuery>,
) -> Json<Vec<ChallengeSummaryOut>> {
  let list = state.list_challenges(q.category.as_deref(), q.difficulty);
  info!(target: "codearena_backend", count = list.len(), "HTTP challenge listing served");
  Json(list.into_iter().map(to_summary).collect())
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_challenge(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<ChallengeOut>, ApiError> {
  let ch = state.get_challenge(&id).ok_or_else(|| not_found("Challenge"))?;
  Ok(Json(to_out(ch)))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_reset_code(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<ResetOut>, ApiError> {
  let ch = state.get_challenge(&id).ok_or_else(|| not_found("Challenge"))?;
  Ok(Json(ResetOut { initial_code: ch.initial_code.clone() }))
}

#[instrument(level = "info", skip(state, identity, body),
             fields(user_id = %identity.user_id, challenge_id = %body.challenge_id, source_len = body.source_code.len()))]
pub async fn http_run(
  State(state): State<Arc<AppState>>,
  identity: Identity,
  Json(body): Json<RunIn>,
) -> Result<Json<RunOut>, ApiError> {
  let outcome = run_submission(&state, &identity, &body.challenge_id, &body.source_code)
    .await
    .map_err(run_error_response)?;
  Ok(Json(to_run_out(outcome)))
}

#[instrument(level = "info", skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn http_get_progress(
  State(state): State<Arc<AppState>>,
  identity: Identity,
) -> Json<HashMap<String, u8>> {
  Json(state.progress.progress_for(&identity.user_id).await)
}

#[instrument(level = "info", skip(state), fields(limit = ?q.limit))]
pub async fn http_leaderboard(
  State(state): State<Arc<AppState>>,
  Query(q): Query<LeaderboardQuery>,
) -> Json<Vec<LeaderboardEntryOut>> {
  let limit = q.limit.unwrap_or(crate::leaderboard::DEFAULT_TOP_N);
  let entries = state.leaderboard.top_n(limit).await;
  Json(entries.iter().map(to_entry_out).collect())
}

#[instrument(level = "info", skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn http_achievements(
  State(state): State<Arc<AppState>>,
  identity: Identity,
) -> Json<Vec<Achievement>> {
  Json(state.achievements.earned_for(&identity.user_id).await)
}

#[instrument(level = "info", skip(state), fields(challenge_id = %q.challenge_id))]
pub async fn http_list_comments(
  State(state): State<Arc<AppState>>,
  Query(q): Query<CommentsQuery>,
) -> Json<Vec<CommentOut>> {
  let comments = state.comments.for_challenge(&q.challenge_id).await;
  Json(comments.iter().map(to_comment_out).collect())
}

#[instrument(level = "info", skip(state, identity, body),
             fields(user_id = %identity.user_id, challenge_id = %body.challenge_id, content_len = body.content.len()))]
pub async fn http_post_comment(
  State(state): State<Arc<AppState>>,
  identity: Identity,
  Json(body): Json<CommentIn>,
) -> Result<Json<CommentOut>, ApiError> {
  if body.content.trim().is_empty() {
    return Err(bad_request("Comment body is empty."));
  }
  if state.get_challenge(&body.challenge_id).is_none() {
    return Err(not_found("Challenge"));
  }
  let comment = state
    .comments
    .add(&body.challenge_id, &identity.user_id, &identity.username, &body.content)
    .await
    .map_err(|e| {
      (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorOut { message: e.to_string() }))
    })?;
  info!(target: "codearena_backend", comment_id = %comment.id, "Comment posted");
  Ok(Json(to_comment_out(&comment)))
}
