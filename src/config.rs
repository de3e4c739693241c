//! Loading the optional challenge bank from TOML.
//!
//! See `ChallengeBank` and `ChallengeCfg` for the expected schema. Bank
//! entries complement the built-in seeds; the catalog is immutable once
//! assembled at startup.

use serde::Deserialize;
use tracing::{info, error};

use crate::domain::{Challenge, ChallengeSource, Difficulty, TestCase};
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ChallengeBank {
  #[serde(default)]
  pub challenges: Vec<ChallengeCfg>,
}

/// Challenge entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct ChallengeCfg {
  #[serde(default)] pub id: Option<String>,
  pub title: String,
  pub description: String,
  pub difficulty: Difficulty,
  pub category: String,
  pub initial_code: String,
  #[serde(default)] pub solution_code: Option<String>,
  #[serde(default)] pub test_cases: Vec<TestCase>,
  #[serde(default)] pub hint: String,
  #[serde(default)] pub video_url: String,
}

impl ChallengeCfg {
  /// Materialize a catalog entry. Entries without test cases are unusable
  /// (nothing to reconcile against) and are rejected here.
  pub fn into_challenge(self) -> Option<Challenge> {
    let id = self.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    if self.test_cases.is_empty() {
      error!(target: "codearena_backend", %id, title = %self.title, "Skipping bank item: no test cases.");
      return None;
    }
    Some(Challenge {
      id,
      title: self.title,
      description: self.description,
      difficulty: self.difficulty,
      category: self.category,
      source: ChallengeSource::LocalBank,
      initial_code: self.initial_code,
      solution_code: self.solution_code,
      test_cases: self.test_cases,
      hint: self.hint,
      video_url: self.video_url,
    })
  }
}

/// Attempt to load a `ChallengeBank` from CHALLENGE_BANK_PATH.
/// On any parsing/IO error, returns None.
pub fn load_challenge_bank_from_env() -> Option<ChallengeBank> {
  let path = std::env::var("CHALLENGE_BANK_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<ChallengeBank>(&s) {
      Ok(bank) => {
        info!(target: "codearena_backend", %path, entries = bank.challenges.len(), "Loaded challenge bank (TOML)");
        Some(bank)
      }
      Err(e) => {
        error!(target: "codearena_backend", %path, error = %e, "Failed to parse TOML challenge bank");
        None
      }
    },
    Err(e) => {
      error!(target: "codearena_backend", %path, error = %e, "Failed to read TOML challenge bank file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bank_entry_without_test_cases_is_rejected() {
    let bank: ChallengeBank = toml::from_str(
      r#"
      [[challenges]]
      title = "Broken"
      description = "no tests"
      difficulty = "Easy"
      category = "Strings"
      initial_code = "class Solution {}"
      "#,
    )
    .expect("parse");
    assert_eq!(bank.challenges.len(), 1);
    assert!(bank.challenges[0].clone().into_challenge().is_none());
  }

  #[test]
  fn bank_entry_round_trips() {
    let bank: ChallengeBank = toml::from_str(
      r#"
      [[challenges]]
      id = "sum-two"
      title = "Sum Two Numbers"
      description = "Read two integers and print their sum."
      difficulty = "Medium"
      category = "Math"
      initial_code = "class Solution {}"
      hint = "Split on whitespace."
      test_cases = [
        { input = "2 7", expected = "9" },
        { input = "-1 1", expected = "0" },
      ]
      "#,
    )
    .expect("parse");
    let ch = bank.challenges[0].clone().into_challenge().expect("challenge");
    assert_eq!(ch.id, "sum-two");
    assert_eq!(ch.difficulty, Difficulty::Medium);
    assert_eq!(ch.test_cases.len(), 2);
    assert_eq!(ch.source, ChallengeSource::LocalBank);
  }
}
