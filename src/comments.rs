//! Challenge discussion threads (the `comments` collection). Append-only;
//! reads are ordered by creation time ascending.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::Comment;
use crate::persist::{load_snapshot, save_snapshot, StoreError};

const COLLECTION: &str = "comments";

#[derive(Clone)]
pub struct CommentStore {
  rows: Arc<RwLock<Vec<Comment>>>,
  path: Option<PathBuf>,
}

impl CommentStore {
  pub fn open(path: Option<PathBuf>) -> Self {
    let rows = load_snapshot::<Vec<Comment>>(path.as_deref(), COLLECTION);
    Self { rows: Arc::new(RwLock::new(rows)), path }
  }

  /// Append a comment, stamping id and creation time.
  #[instrument(level = "debug", skip(self, content), fields(%challenge_id, %user_id, content_len = content.len()))]
  pub async fn add(
    &self,
    challenge_id: &str,
    user_id: &str,
    username: &str,
    content: &str,
  ) -> Result<Comment, StoreError> {
    let comment = Comment {
      id: Uuid::new_v4().to_string(),
      challenge_id: challenge_id.to_string(),
      user_id: user_id.to_string(),
      username: username.to_string(),
      content: content.to_string(),
      created_at: Utc::now(),
    };
    let mut rows = self.rows.write().await;
    rows.push(comment.clone());
    save_snapshot(self.path.as_deref(), COLLECTION, &*rows)?;
    Ok(comment)
  }

  /// All comments for one challenge, oldest first.
  pub async fn for_challenge(&self, challenge_id: &str) -> Vec<Comment> {
    let rows = self.rows.read().await;
    let mut out: Vec<Comment> =
      rows.iter().filter(|c| c.challenge_id == challenge_id).cloned().collect();
    out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn reads_are_scoped_and_ascending() {
    let store = CommentStore::open(None);
    store.add("ch1", "u1", "alice", "first!").await.expect("add");
    store.add("ch2", "u2", "bob", "other thread").await.expect("add");
    store.add("ch1", "u2", "bob", "second").await.expect("add");

    let thread = store.for_challenge("ch1").await;
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].content, "first!");
    assert_eq!(thread[1].content, "second");
    assert!(thread[0].created_at <= thread[1].created_at);
  }
}
