//! Cumulative scores and the ranked top-N view (the `leaderboard` collection).
//!
//! Documents are keyed by user id and carry the display name, the score, and
//! the set of challenges already credited. A (user, challenge) pair is
//! credited exactly once; replays refresh the username but never the score.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::domain::LeaderboardEntry;
use crate::persist::{load_snapshot, save_snapshot, StoreError};

pub const DEFAULT_TOP_N: usize = 10;

const COLLECTION: &str = "leaderboard";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct BoardRecord {
  username: String,
  score: u32,
  credited: HashSet<String>,
}

#[derive(Clone)]
pub struct LeaderboardStore {
  rows: Arc<RwLock<HashMap<String, BoardRecord>>>,
  path: Option<PathBuf>,
}

impl LeaderboardStore {
  pub fn open(path: Option<PathBuf>) -> Self {
    let rows = load_snapshot::<HashMap<String, BoardRecord>>(path.as_deref(), COLLECTION);
    Self { rows: Arc::new(RwLock::new(rows)), path }
  }

  /// Credit a full pass. Returns whether the (user, challenge) pair was new;
  /// only a new pair bumps the score.
  #[instrument(level = "debug", skip(self), fields(%user_id, %username, %challenge_id))]
  pub async fn credit(
    &self,
    user_id: &str,
    username: &str,
    challenge_id: &str,
  ) -> Result<bool, StoreError> {
    let mut rows = self.rows.write().await;
    let record = rows.entry(user_id.to_string()).or_default();
    record.username = username.to_string();

    let newly = record.credited.insert(challenge_id.to_string());
    if newly {
      record.score += 1;
      info!(target: "submission", %user_id, %challenge_id, score = record.score, "Leaderboard credited");
    }
    save_snapshot(self.path.as_deref(), COLLECTION, &*rows)?;
    Ok(newly)
  }

  /// Ranked view: score descending, username ascending on ties, truncated
  /// to `n`.
  pub async fn top_n(&self, n: usize) -> Vec<LeaderboardEntry> {
    let rows = self.rows.read().await;
    let mut entries: Vec<LeaderboardEntry> = rows
      .iter()
      .map(|(user_id, r)| LeaderboardEntry {
        user_id: user_id.clone(),
        username: r.username.clone(),
        score: r.score,
      })
      .collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.username.cmp(&b.username)));
    entries.truncate(n);
    entries
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn credit_appears_in_top_n() {
    let store = LeaderboardStore::open(None);
    assert!(store.credit("u1", "alice", "ch1").await.expect("credit"));

    let top = store.top_n(DEFAULT_TOP_N).await;
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].username, "alice");
    assert!(top[0].score >= 1);
  }

  #[tokio::test]
  async fn same_challenge_is_credited_once() {
    let store = LeaderboardStore::open(None);
    assert!(store.credit("u1", "alice", "ch1").await.expect("credit"));
    assert!(!store.credit("u1", "alice", "ch1").await.expect("credit"));

    let top = store.top_n(DEFAULT_TOP_N).await;
    assert_eq!(top[0].score, 1);
  }

  #[tokio::test]
  async fn ranking_is_descending_and_truncated() {
    let store = LeaderboardStore::open(None);
    for ch in ["ch1", "ch2", "ch3"] {
      store.credit("u1", "alice", ch).await.expect("credit");
    }
    store.credit("u2", "bob", "ch1").await.expect("credit");
    store.credit("u3", "carol", "ch1").await.expect("credit");

    let top = store.top_n(2).await;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].username, "alice");
    assert_eq!(top[0].score, 3);
    // bob and carol tie at 1; username ascending puts bob first.
    assert_eq!(top[1].username, "bob");
  }

  #[tokio::test]
  async fn replay_refreshes_username_only() {
    let store = LeaderboardStore::open(None);
    store.credit("u1", "alice", "ch1").await.expect("credit");
    store.credit("u1", "alice.renamed", "ch1").await.expect("credit");

    let top = store.top_n(DEFAULT_TOP_N).await;
    assert_eq!(top[0].username, "alice.renamed");
    assert_eq!(top[0].score, 1);
  }
}
