//! Submission orchestration shared by the HTTP and WebSocket handlers.
//!
//! One run request moves through: catalog guard → judge call → positional
//! reconciliation → (on a full pass) the settlement saga. Settlement is an
//! ordered sequence of separate store writes with no transactional grouping;
//! every step is idempotent (progress upsert, once-per-pair credit,
//! set-semantics award), so when a later step fails after an earlier one
//! committed, the recovery path is simply re-running the submission.

use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::Achievement;
use crate::judge::{JudgeError, JudgeVerdict};
use crate::persist::StoreError;
use crate::reconcile::{reconcile, TestOutcome};
use crate::session::Identity;
use crate::state::AppState;
use crate::util::trunc_for_log;

#[derive(Debug, Error)]
pub enum RunError {
  #[error("challenge {0} is not loaded")]
  MissingChallenge(String),
  #[error(transparent)]
  Judge(#[from] JudgeError),
  #[error("{step} update failed after evaluation (already applied: {applied:?}): {source}")]
  PartialUpdate {
    step: &'static str,
    applied: Vec<&'static str>,
    #[source] source: StoreError,
  },
}

/// Everything the caller needs to render an evaluated run.
#[derive(Debug)]
pub struct RunReport {
  pub outcomes: Vec<TestOutcome>,
  pub all_passed: bool,
  pub progress_percent: u8,
  pub newly_credited: bool,
  pub newly_earned: Vec<Achievement>,
}

/// Terminal result of one run request.
#[derive(Debug)]
pub enum RunOutcome {
  Evaluated(RunReport),
  /// The judge refused the program (compile error, limits, ...). Nothing
  /// was written.
  Rejected { status_id: i64, description: String },
}

/// Run one submission end to end.
#[instrument(level = "info", skip(state, identity, source_code),
             fields(user_id = %identity.user_id, %challenge_id, source_len = source_code.len()))]
pub async fn run_submission(
  state: &AppState,
  identity: &Identity,
  challenge_id: &str,
  source_code: &str,
) -> Result<RunOutcome, RunError> {
  let challenge = state
    .get_challenge(challenge_id)
    .ok_or_else(|| RunError::MissingChallenge(challenge_id.to_string()))?;
  let judge = state.judge.as_ref().ok_or(JudgeError::Configuration)?;

  // One shared execution: all test-case inputs become a single stdin blob.
  let stdin = challenge
    .test_cases
    .iter()
    .map(|tc| tc.input.as_str())
    .collect::<Vec<_>>()
    .join("\n");

  match judge.submit(source_code, &stdin).await? {
    JudgeVerdict::Rejected { status_id, description } => {
      info!(target: "submission", %challenge_id, %status_id, "Run rejected by judge");
      Ok(RunOutcome::Rejected { status_id, description })
    }
    JudgeVerdict::Evaluated { stdout, stderr } => {
      if !stderr.is_empty() {
        tracing::debug!(target: "submission", %challenge_id, stderr = %trunc_for_log(&stderr, 200), "Program wrote to stderr");
      }
      let report = settle_evaluation(state, identity, challenge_id, &stdout).await?;
      Ok(RunOutcome::Evaluated(report))
    }
  }
}

/// Reconcile evaluated stdout and, on a full pass, fan out the settlement
/// saga: progress → leaderboard → achievements.
pub(crate) async fn settle_evaluation(
  state: &AppState,
  identity: &Identity,
  challenge_id: &str,
  stdout: &str,
) -> Result<RunReport, RunError> {
  let challenge = state
    .get_challenge(challenge_id)
    .ok_or_else(|| RunError::MissingChallenge(challenge_id.to_string()))?;

  let recon = reconcile(&challenge.test_cases, stdout);
  info!(target: "submission", %challenge_id, all_passed = recon.all_passed,
        cases = recon.outcomes.len(), "Reconciled judge output");

  if !recon.all_passed {
    let percent = state
      .progress
      .progress_for(&identity.user_id)
      .await
      .get(challenge_id)
      .copied()
      .unwrap_or(0);
    return Ok(RunReport {
      outcomes: recon.outcomes,
      all_passed: false,
      progress_percent: percent,
      newly_credited: false,
      newly_earned: Vec::new(),
    });
  }

  let mut applied: Vec<&'static str> = Vec::new();

  state
    .progress
    .set_progress(&identity.user_id, challenge_id, 100)
    .await
    .map_err(|source| RunError::PartialUpdate { step: "progress", applied: applied.clone(), source })?;
  applied.push("progress");

  let newly_credited = state
    .leaderboard
    .credit(&identity.user_id, &identity.username, challenge_id)
    .await
    .map_err(|source| RunError::PartialUpdate { step: "leaderboard", applied: applied.clone(), source })?;
  applied.push("leaderboard");

  let completed = state.progress.completed_count(&identity.user_id).await;
  let newly_earned = state
    .achievements
    .evaluate(&identity.user_id, completed)
    .await
    .map_err(|source| RunError::PartialUpdate { step: "achievements", applied: applied.clone(), source })?;

  info!(target: "submission", user_id = %identity.user_id, %challenge_id,
        newly_credited, completed, earned = newly_earned.len(), "Full pass settled");

  Ok(RunReport {
    outcomes: recon.outcomes,
    all_passed: true,
    progress_percent: 100,
    newly_credited,
    newly_earned,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Challenge, ChallengeSource, Difficulty, TestCase};
  use crate::state::AppState;

  fn two_case_challenge() -> Challenge {
    Challenge {
      id: "ch1".into(),
      title: "Echo Mapper".into(),
      description: "Map a to X and b to Y.".into(),
      difficulty: Difficulty::Easy,
      category: "Strings".into(),
      source: ChallengeSource::Seed,
      initial_code: String::new(),
      solution_code: None,
      test_cases: vec![
        TestCase { input: "a".into(), expected: "X".into() },
        TestCase { input: "b".into(), expected: "Y".into() },
      ],
      hint: String::new(),
      video_url: String::new(),
    }
  }

  fn state_with(challenges: Vec<Challenge>) -> AppState {
    AppState::assemble(challenges, None)
  }

  fn alice() -> Identity {
    Identity {
      user_id: "u1".into(),
      email: "alice@example.com".into(),
      username: "alice".into(),
    }
  }

  #[tokio::test]
  async fn full_pass_settles_all_three_stores() {
    let state = state_with(vec![two_case_challenge()]);
    let identity = alice();

    let report = settle_evaluation(&state, &identity, "ch1", "X\nY\n").await.expect("report");
    assert!(report.all_passed);
    assert_eq!(report.progress_percent, 100);
    assert!(report.newly_credited);
    assert_eq!(report.newly_earned.len(), 1);
    assert_eq!(report.newly_earned[0].id, "FIRST_CHALLENGE");

    assert_eq!(state.progress.progress_for("u1").await.get("ch1"), Some(&100));
    let top = state.leaderboard.top_n(10).await;
    assert_eq!(top[0].username, "alice");
    assert_eq!(top[0].score, 1);
  }

  #[tokio::test]
  async fn failed_case_writes_nothing() {
    let state = state_with(vec![two_case_challenge()]);
    let identity = alice();

    let report = settle_evaluation(&state, &identity, "ch1", "X\nZ\n").await.expect("report");
    assert!(!report.all_passed);
    assert!(report.outcomes[0].passed);
    assert!(!report.outcomes[1].passed);
    assert_eq!(report.progress_percent, 0);

    assert!(state.progress.progress_for("u1").await.is_empty());
    assert!(state.leaderboard.top_n(10).await.is_empty());
    assert!(state.achievements.earned_for("u1").await.is_empty());
  }

  #[tokio::test]
  async fn replayed_pass_credits_once() {
    let state = state_with(vec![two_case_challenge()]);
    let identity = alice();

    let first = settle_evaluation(&state, &identity, "ch1", "X\nY").await.expect("report");
    assert!(first.newly_credited);
    let second = settle_evaluation(&state, &identity, "ch1", "X\nY").await.expect("report");
    assert!(!second.newly_credited);
    assert!(second.newly_earned.is_empty());

    assert_eq!(state.leaderboard.top_n(10).await[0].score, 1);
  }

  #[tokio::test]
  async fn unknown_challenge_blocks_the_run() {
    let state = state_with(vec![]);
    let identity = alice();

    let err = run_submission(&state, &identity, "nope", "class Main {}").await.unwrap_err();
    assert!(matches!(err, RunError::MissingChallenge(_)));
  }

  #[tokio::test]
  async fn missing_judge_credential_fails_before_any_write() {
    let state = state_with(vec![two_case_challenge()]);
    let identity = alice();

    let err = run_submission(&state, &identity, "ch1", "class Main {}").await.unwrap_err();
    assert!(matches!(err, RunError::Judge(JudgeError::Configuration)));
    assert!(state.progress.progress_for("u1").await.is_empty());
    assert!(state.leaderboard.top_n(10).await.is_empty());
  }

  #[tokio::test]
  async fn transport_failure_writes_nothing() {
    use crate::judge::JudgeClient;

    // Nothing listens on port 1; the judge call fails at connect time.
    let judge = JudgeClient {
      client: reqwest::Client::new(),
      api_key: "test-key".into(),
      base_url: "http://127.0.0.1:1".into(),
      api_host: "localhost".into(),
      language_id: 62,
    };
    let state = AppState::assemble(vec![two_case_challenge()], Some(judge));
    let identity = alice();

    let err = run_submission(&state, &identity, "ch1", "class Main {}").await.unwrap_err();
    assert!(matches!(err, RunError::Judge(JudgeError::Transport(_))));
    assert!(state.progress.progress_for("u1").await.is_empty());
    assert!(state.leaderboard.top_n(10).await.is_empty());
    assert!(state.achievements.earned_for("u1").await.is_empty());
  }
}
