//! Minimal client for the remote judging service (Judge0-compatible API).
//!
//! We only call the synchronous submission endpoint (`wait=true`): one POST
//! carries the source code plus the combined stdin, and the reply carries a
//! status classification with the raw stdout/stderr. Calls are instrumented
//! and log status ids, latencies, and payload sizes (not source code).
//!
//! NOTE: We never log the API key. There is no retry and no idempotency key;
//! a second identical call always re-executes on the judge.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{instrument, info, error};

/// Public Judge0 CE deployment on RapidAPI; override with JUDGE_BASE_URL.
const DEFAULT_BASE_URL: &str = "https://judge0-ce.p.rapidapi.com";
const DEFAULT_API_HOST: &str = "judge0-ce.p.rapidapi.com";
/// Runtime the submissions are executed with (62 = Java / OpenJDK).
const DEFAULT_LANGUAGE_ID: u32 = 62;

/// Status ids at or below this are settled ("In Queue"/"Processing" are 1-2,
/// "Accepted" is 3); anything above reports a judge-side rejection such as a
/// compile error or a resource limit.
const LAST_SETTLED_STATUS: i64 = 3;

#[derive(Debug, Error)]
pub enum JudgeError {
  #[error("no judge credential configured (set JUDGE_API_KEY)")]
  Configuration,
  #[error("judge request failed: {0}")]
  Transport(String),
  #[error("judge response malformed: {0}")]
  MalformedResponse(String),
}

/// Boundary-validated outcome of one submission call.
#[derive(Debug, Clone)]
pub enum JudgeVerdict {
  /// The program was executed; stdout is ready for reconciliation.
  Evaluated { stdout: String, stderr: String },
  /// The judge refused or aborted the run (compile error, limits, ...).
  Rejected { status_id: i64, description: String },
}

#[derive(Clone)]
pub struct JudgeClient {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub api_host: String,
  pub language_id: u32,
}

impl JudgeClient {
  /// Construct the client if we find JUDGE_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("JUDGE_API_KEY").ok()?;
    let base_url =
      std::env::var("JUDGE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let api_host =
      std::env::var("JUDGE_API_HOST").unwrap_or_else(|_| DEFAULT_API_HOST.into());
    let language_id = std::env::var("JUDGE_LANGUAGE_ID")
      .ok()
      .and_then(|v| v.parse::<u32>().ok())
      .unwrap_or(DEFAULT_LANGUAGE_ID);

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, api_host, language_id })
  }

  /// Submit source code with the combined stdin blob and wait for the result.
  #[instrument(level = "info", skip(self, source_code, stdin),
               fields(source_len = source_code.len(), stdin_len = stdin.len(), language_id = self.language_id))]
  pub async fn submit(&self, source_code: &str, stdin: &str) -> Result<JudgeVerdict, JudgeError> {
    let url = format!("{}/submissions?base64_encoded=false&wait=true", self.base_url);
    let req = SubmissionReq {
      source_code: source_code.to_string(),
      language_id: self.language_id,
      stdin: stdin.to_string(),
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "codearena-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header("X-RapidAPI-Key", &self.api_key)
      .header("X-RapidAPI-Host", &self.api_host)
      .json(&req).send().await
      .map_err(|e| JudgeError::Transport(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_judge_error(&body).unwrap_or(body);
      error!(target: "submission", %status, error = %msg, "Judge HTTP error");
      return Err(JudgeError::Transport(format!("judge HTTP {}: {}", status, msg)));
    }

    let body = res.text().await.map_err(|e| JudgeError::Transport(e.to_string()))?;
    let verdict = classify_reply(&body)?;
    let elapsed = start.elapsed();
    match &verdict {
      JudgeVerdict::Evaluated { stdout, stderr } => {
        info!(target: "submission", ?elapsed, stdout_len = stdout.len(), stderr_len = stderr.len(), "Judge evaluated submission");
      }
      JudgeVerdict::Rejected { status_id, description } => {
        info!(target: "submission", ?elapsed, %status_id, %description, "Judge rejected submission");
      }
    }
    Ok(verdict)
  }
}

/// Validate a raw reply body into a tagged verdict. A body that is not JSON
/// or lacks `status.id` is rejected here instead of being indexed blindly.
fn classify_reply(body: &str) -> Result<JudgeVerdict, JudgeError> {
  let reply: SubmissionResp = serde_json::from_str(body)
    .map_err(|e| JudgeError::MalformedResponse(format!("body is not valid JSON: {e}")))?;

  let status_id = reply
    .status
    .as_ref()
    .and_then(|s| s.id)
    .ok_or_else(|| JudgeError::MalformedResponse("missing status.id".into()))?;
  let description = reply
    .status
    .and_then(|s| s.description)
    .unwrap_or_else(|| "unknown".into());

  if status_id <= LAST_SETTLED_STATUS {
    Ok(JudgeVerdict::Evaluated {
      stdout: reply.stdout.unwrap_or_default(),
      stderr: reply.stderr.unwrap_or_default(),
    })
  } else {
    Ok(JudgeVerdict::Rejected { status_id, description })
  }
}

// --- Wire DTOs ---

#[derive(Serialize)]
struct SubmissionReq {
  source_code: String,
  language_id: u32,
  stdin: String,
}

#[derive(Deserialize)]
struct SubmissionResp {
  #[serde(default)] status: Option<StatusResp>,
  #[serde(default)] stdout: Option<String>,
  #[serde(default)] stderr: Option<String>,
}

#[derive(Deserialize)]
struct StatusResp {
  #[serde(default)] id: Option<i64>,
  #[serde(default)] description: Option<String>,
}

/// Try to extract a clean error message from a judge error body.
fn extract_judge_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: Option<String>, message: Option<String> }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => w.error.or(w.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn settled_status_yields_evaluated() {
    let v = classify_reply(r#"{"status":{"id":3,"description":"Accepted"},"stdout":"9\n","stderr":null}"#)
      .expect("verdict");
    match v {
      JudgeVerdict::Evaluated { stdout, stderr } => {
        assert_eq!(stdout, "9\n");
        assert!(stderr.is_empty());
      }
      other => panic!("unexpected verdict: {other:?}"),
    }
  }

  #[test]
  fn high_status_yields_rejected() {
    let v = classify_reply(r#"{"status":{"id":6,"description":"Compilation Error"},"stderr":"Main.java:3"}"#)
      .expect("verdict");
    match v {
      JudgeVerdict::Rejected { status_id, description } => {
        assert_eq!(status_id, 6);
        assert_eq!(description, "Compilation Error");
      }
      other => panic!("unexpected verdict: {other:?}"),
    }
  }

  #[test]
  fn missing_status_is_malformed() {
    let err = classify_reply(r#"{"stdout":"9"}"#).unwrap_err();
    assert!(matches!(err, JudgeError::MalformedResponse(_)));
    let err = classify_reply("not json").unwrap_err();
    assert!(matches!(err, JudgeError::MalformedResponse(_)));
  }
}
