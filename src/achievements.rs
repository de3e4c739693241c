//! Milestone achievements (the `userAchievements` collection) and the
//! evaluator that awards them.
//!
//! Milestones fire on an *exact* completed-challenge count, not "at least":
//! a user whose count jumps past a milestone (bulk import, concurrent
//! completions) skips that award. This mirrors the platform's established
//! behavior and is pinned by test.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::domain::Achievement;
use crate::persist::{load_snapshot, save_snapshot, StoreError};

const COLLECTION: &str = "userAchievements";

struct MilestoneDef {
  id: &'static str,
  name: &'static str,
  description: &'static str,
  icon: &'static str,
  completed: usize,
}

const MILESTONES: &[MilestoneDef] = &[
  MilestoneDef {
    id: "FIRST_CHALLENGE",
    name: "First Steps",
    description: "Complete your first challenge",
    icon: "🎉",
    completed: 1,
  },
  MilestoneDef {
    id: "FIVE_CHALLENGES",
    name: "Getting Started",
    description: "Complete 5 challenges",
    icon: "🚀",
    completed: 5,
  },
  MilestoneDef {
    id: "TEN_CHALLENGES",
    name: "On a Roll",
    description: "Complete 10 challenges",
    icon: "🔥",
    completed: 10,
  },
];

impl MilestoneDef {
  fn to_achievement(&self) -> Achievement {
    Achievement {
      id: self.id.to_string(),
      name: self.name.to_string(),
      description: self.description.to_string(),
      icon: self.icon.to_string(),
    }
  }
}

#[derive(Clone)]
pub struct AchievementStore {
  earned: Arc<RwLock<HashMap<String, Vec<Achievement>>>>,
  path: Option<PathBuf>,
}

impl AchievementStore {
  pub fn open(path: Option<PathBuf>) -> Self {
    let earned =
      load_snapshot::<HashMap<String, Vec<Achievement>>>(path.as_deref(), COLLECTION);
    Self { earned: Arc::new(RwLock::new(earned)), path }
  }

  /// Achievements the user has earned so far.
  pub async fn earned_for(&self, user_id: &str) -> Vec<Achievement> {
    self.earned.read().await.get(user_id).cloned().unwrap_or_default()
  }

  /// Persist one earned achievement. Set semantics: an id the user already
  /// holds is left alone.
  #[instrument(level = "debug", skip(self, achievement), fields(%user_id, achievement_id = %achievement.id))]
  pub async fn award(&self, user_id: &str, achievement: Achievement) -> Result<(), StoreError> {
    let mut earned = self.earned.write().await;
    let list = earned.entry(user_id.to_string()).or_default();
    if list.iter().any(|a| a.id == achievement.id) {
      return Ok(());
    }
    list.push(achievement);
    save_snapshot(self.path.as_deref(), COLLECTION, &*earned)
  }

  /// Award every milestone whose count exactly equals `completed_count` and
  /// which the user does not hold yet. Each award is persisted individually;
  /// the newly earned list is returned for caller notification.
  #[instrument(level = "info", skip(self), fields(%user_id, completed_count))]
  pub async fn evaluate(
    &self,
    user_id: &str,
    completed_count: usize,
  ) -> Result<Vec<Achievement>, StoreError> {
    let held = self.earned_for(user_id).await;
    let due: Vec<Achievement> = MILESTONES
      .iter()
      .filter(|m| m.completed == completed_count && !held.iter().any(|a| a.id == m.id))
      .map(MilestoneDef::to_achievement)
      .collect();

    for achievement in &due {
      self.award(user_id, achievement.clone()).await?;
      info!(target: "submission", %user_id, achievement = %achievement.id, "Achievement earned");
    }
    Ok(due)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn first_completion_earns_first_steps() {
    let store = AchievementStore::open(None);
    let new = store.evaluate("u1", 1).await.expect("evaluate");
    assert_eq!(new.len(), 1);
    assert_eq!(new[0].id, "FIRST_CHALLENGE");
    assert_eq!(new[0].name, "First Steps");
  }

  #[tokio::test]
  async fn re_evaluation_awards_nothing() {
    let store = AchievementStore::open(None);
    store.evaluate("u1", 1).await.expect("evaluate");
    let again = store.evaluate("u1", 1).await.expect("evaluate");
    assert!(again.is_empty());
    assert_eq!(store.earned_for("u1").await.len(), 1);
  }

  #[tokio::test]
  async fn thresholds_are_exact_not_at_least() {
    let store = AchievementStore::open(None);
    // Jumping straight to 5 earns the five-challenge badge but does NOT
    // retroactively award the first-challenge one.
    let new = store.evaluate("u1", 5).await.expect("evaluate");
    assert_eq!(new.len(), 1);
    assert_eq!(new[0].id, "FIVE_CHALLENGES");

    let held = store.earned_for("u1").await;
    assert!(!held.iter().any(|a| a.id == "FIRST_CHALLENGE"));
  }

  #[tokio::test]
  async fn off_milestone_counts_award_nothing() {
    let store = AchievementStore::open(None);
    assert!(store.evaluate("u1", 3).await.expect("evaluate").is_empty());
    assert!(store.evaluate("u1", 0).await.expect("evaluate").is_empty());
  }

  #[tokio::test]
  async fn award_is_set_semantics() {
    let store = AchievementStore::open(None);
    let badge = MILESTONES[0].to_achievement();
    store.award("u1", badge.clone()).await.expect("award");
    store.award("u1", badge).await.expect("award");
    assert_eq!(store.earned_for("u1").await.len(), 1);
  }
}
