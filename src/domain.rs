//! Domain models used by the backend: challenges, test cases, achievements,
//! leaderboard rows, and comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Challenge difficulty tiers shown in the catalog filters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

/// Where did we get the challenge from?
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeSource {
  LocalBank,   // from user-provided TOML bank
  Seed,        // built-in seeds
}

/// One correctness check: the judge runs the program against `input` and the
/// matching stdout line must equal `expected`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestCase {
  pub input: String,
  pub expected: String,
}

/// Core challenge structure. Immutable once the catalog is assembled.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Challenge {
  pub id: String,
  pub title: String,
  pub description: String,
  pub difficulty: Difficulty,
  pub category: String,        // free-form (e.g., "Strings", "Arrays")
  pub source: ChallengeSource,

  pub initial_code: String,    // boilerplate handed to the editor
  #[serde(default)] pub solution_code: Option<String>,
  pub test_cases: Vec<TestCase>,
  #[serde(default)] pub hint: String,
  #[serde(default)] pub video_url: String,
}

/// A badge earned when the completed-challenge counter first equals a
/// fixed milestone.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Achievement {
  pub id: String,
  pub name: String,
  pub description: String,
  pub icon: String,
}

/// One row of the ranked leaderboard view.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaderboardEntry {
  pub user_id: String,
  pub username: String,
  pub score: u32,
}

/// Discussion entry attached to a challenge. Append-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
  pub id: String,
  pub challenge_id: String,
  pub user_id: String,
  pub username: String,
  pub content: String,
  pub created_at: DateTime<Utc>,
}
