//! Explicit session lifecycle: the identity provider's sign-in callback
//! trades a user id + email for a bearer token, and every operation that
//! needs identity receives it as an explicit argument (an axum extractor)
//! instead of reading ambient global state.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
  async_trait,
  extract::FromRequestParts,
  http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
  Json,
};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::protocol::ErrorOut;
use crate::state::AppState;
use crate::util::username_from_email;

const TOKEN_LENGTH: usize = 48;

/// Who is acting. Threaded through every identity-requiring operation.
#[derive(Clone, Debug)]
pub struct Identity {
  pub user_id: String,
  pub email: String,
  pub username: String,
}

#[derive(Clone, Default)]
pub struct SessionStore {
  tokens: Arc<RwLock<HashMap<String, Identity>>>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start a session for a signed-in user; returns the bearer token.
  #[instrument(level = "info", skip(self, email), fields(%user_id))]
  pub async fn sign_in(&self, user_id: &str, email: &str) -> (String, Identity) {
    let token: String = rand::thread_rng()
      .sample_iter(&Alphanumeric)
      .take(TOKEN_LENGTH)
      .map(char::from)
      .collect();
    let identity = Identity {
      user_id: user_id.to_string(),
      email: email.to_string(),
      username: username_from_email(email),
    };
    self.tokens.write().await.insert(token.clone(), identity.clone());
    info!(target: "codearena_backend", %user_id, username = %identity.username, "Session started");
    (token, identity)
  }

  /// End a session. Returns whether the token was known.
  #[instrument(level = "info", skip(self, token))]
  pub async fn sign_out(&self, token: &str) -> bool {
    let removed = self.tokens.write().await.remove(token);
    if let Some(identity) = &removed {
      info!(target: "codearena_backend", user_id = %identity.user_id, "Session ended");
    }
    removed.is_some()
  }

  pub async fn identity_for(&self, token: &str) -> Option<Identity> {
    self.tokens.read().await.get(token).cloned()
  }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
}

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorOut>) {
  (StatusCode::UNAUTHORIZED, Json(ErrorOut { message: message.to_string() }))
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Identity {
  type Rejection = (StatusCode, Json<ErrorOut>);

  async fn from_request_parts(
    parts: &mut Parts,
    state: &Arc<AppState>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)
      .ok_or_else(|| unauthorized("Missing bearer token."))?;
    state
      .sessions
      .identity_for(token)
      .await
      .ok_or_else(|| unauthorized("Session unknown or ended."))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn session_lifecycle() {
    let sessions = SessionStore::new();
    let (token, identity) = sessions.sign_in("u1", "alice@example.com").await;
    assert_eq!(identity.username, "alice");

    let resolved = sessions.identity_for(&token).await.expect("identity");
    assert_eq!(resolved.user_id, "u1");

    assert!(sessions.sign_out(&token).await);
    assert!(sessions.identity_for(&token).await.is_none());
    assert!(!sessions.sign_out(&token).await);
  }

  #[tokio::test]
  async fn tokens_are_distinct() {
    let sessions = SessionStore::new();
    let (t1, _) = sessions.sign_in("u1", "alice@example.com").await;
    let (t2, _) = sessions.sign_in("u1", "alice@example.com").await;
    assert_ne!(t1, t2);
  }
}
