//! Per-user challenge progress (the `userProgress` collection).
//!
//! Documents are keyed by user id; fields map challenge id → completion
//! percent. Writes are merge-upserts: setting one challenge's percent leaves
//! the user's other entries untouched.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::instrument;

use crate::persist::{load_snapshot, save_snapshot, StoreError};

type ProgressMap = HashMap<String, HashMap<String, u8>>;

const COLLECTION: &str = "userProgress";

#[derive(Clone)]
pub struct ProgressStore {
  records: Arc<RwLock<ProgressMap>>,
  path: Option<PathBuf>,
}

impl ProgressStore {
  pub fn open(path: Option<PathBuf>) -> Self {
    let records = load_snapshot::<ProgressMap>(path.as_deref(), COLLECTION);
    Self { records: Arc::new(RwLock::new(records)), path }
  }

  /// Merge-upsert one challenge's completion percent (clamped to 100).
  #[instrument(level = "debug", skip(self), fields(%user_id, %challenge_id, percent))]
  pub async fn set_progress(
    &self,
    user_id: &str,
    challenge_id: &str,
    percent: u8,
  ) -> Result<(), StoreError> {
    let mut records = self.records.write().await;
    records
      .entry(user_id.to_string())
      .or_default()
      .insert(challenge_id.to_string(), percent.min(100));
    save_snapshot(self.path.as_deref(), COLLECTION, &*records)
  }

  /// The user's challenge → percent map. Missing users read as empty;
  /// callers default absent challenges to 0.
  pub async fn progress_for(&self, user_id: &str) -> HashMap<String, u8> {
    self.records.read().await.get(user_id).cloned().unwrap_or_default()
  }

  /// Number of challenges the user has fully completed.
  pub async fn completed_count(&self, user_id: &str) -> usize {
    self
      .records
      .read()
      .await
      .get(user_id)
      .map(|m| m.values().filter(|p| **p >= 100).count())
      .unwrap_or(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn upsert_merges_instead_of_replacing() {
    let store = ProgressStore::open(None);
    store.set_progress("u1", "ch1", 100).await.expect("write");
    store.set_progress("u1", "ch2", 40).await.expect("write");
    store.set_progress("u1", "ch2", 100).await.expect("write");

    let map = store.progress_for("u1").await;
    assert_eq!(map.get("ch1"), Some(&100));
    assert_eq!(map.get("ch2"), Some(&100));
    assert_eq!(map.get("ch3"), None); // caller defaults this to 0
  }

  #[tokio::test]
  async fn completed_counts_only_full_passes() {
    let store = ProgressStore::open(None);
    store.set_progress("u1", "ch1", 100).await.expect("write");
    store.set_progress("u1", "ch2", 60).await.expect("write");
    assert_eq!(store.completed_count("u1").await, 1);
    assert_eq!(store.completed_count("nobody").await, 0);
  }

  #[tokio::test]
  async fn percent_is_clamped() {
    let store = ProgressStore::open(None);
    store.set_progress("u1", "ch1", 250).await.expect("write");
    assert_eq!(store.progress_for("u1").await.get("ch1"), Some(&100));
  }

  #[tokio::test]
  async fn snapshot_round_trip() {
    let path = std::env::temp_dir().join(format!("progress-{}.json", uuid::Uuid::new_v4()));
    let store = ProgressStore::open(Some(path.clone()));
    store.set_progress("u1", "ch1", 100).await.expect("write");

    let reopened = ProgressStore::open(Some(path.clone()));
    assert_eq!(reopened.progress_for("u1").await.get("ch1"), Some(&100));
    let _ = std::fs::remove_file(path);
  }
}
