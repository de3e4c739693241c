//! Pairing judge output against expected test-case outputs.
//!
//! All test cases share one execution: their inputs are joined into a single
//! stdin blob, and per-case output is recovered by splitting the combined
//! stdout on newlines, positionally. Line *i* answers test case *i*. Nothing
//! in the judge's output marks case boundaries, so a program that emits the
//! wrong number of lines misaligns from that point on.

use serde::Serialize;

use crate::domain::TestCase;

/// Verdict for a single test case.
#[derive(Clone, Debug, Serialize)]
pub struct TestOutcome {
  pub input: String,
  pub expected: String,
  pub actual: String,
  pub passed: bool,
}

/// Per-case outcomes plus the aggregate verdict.
#[derive(Clone, Debug, Serialize)]
pub struct Reconciliation {
  pub outcomes: Vec<TestOutcome>,
  pub all_passed: bool,
}

/// Compare judge stdout against the expected outputs, positionally.
///
/// The stdout is trimmed as a whole (individual lines are not), then split
/// on `'\n'`. Equality is exact per line. A missing line never passes, even
/// against an empty expectation. An empty test-case sequence trivially
/// passes.
pub fn reconcile(test_cases: &[TestCase], raw_stdout: &str) -> Reconciliation {
  let lines: Vec<&str> = raw_stdout.trim().split('\n').collect();

  let outcomes: Vec<TestOutcome> = test_cases
    .iter()
    .enumerate()
    .map(|(i, tc)| {
      let line = lines.get(i).copied();
      TestOutcome {
        input: tc.input.clone(),
        expected: tc.expected.clone(),
        actual: line.unwrap_or_default().to_string(),
        passed: line == Some(tc.expected.as_str()),
      }
    })
    .collect();

  let all_passed = outcomes.iter().all(|o| o.passed);
  Reconciliation { outcomes, all_passed }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cases(pairs: &[(&str, &str)]) -> Vec<TestCase> {
    pairs
      .iter()
      .map(|(i, e)| TestCase { input: (*i).into(), expected: (*e).into() })
      .collect()
  }

  #[test]
  fn pairs_lines_positionally() {
    let r = reconcile(&cases(&[("a", "X"), ("b", "Y")]), "X\nY\n");
    assert_eq!(r.outcomes.len(), 2);
    assert!(r.outcomes[0].passed && r.outcomes[1].passed);
    assert!(r.all_passed);
    assert_eq!(r.outcomes[1].actual, "Y");
  }

  #[test]
  fn one_mismatch_fails_the_aggregate() {
    let r = reconcile(&cases(&[("a", "X"), ("b", "Y")]), "X\nZ\n");
    assert!(r.outcomes[0].passed);
    assert!(!r.outcomes[1].passed);
    assert_eq!(r.outcomes[1].actual, "Z");
    assert!(!r.all_passed);
  }

  #[test]
  fn empty_suite_trivially_passes() {
    let r = reconcile(&[], "whatever the program printed");
    assert!(r.outcomes.is_empty());
    assert!(r.all_passed);
  }

  #[test]
  fn missing_line_never_passes() {
    let r = reconcile(&cases(&[("a", "X"), ("b", "")]), "X");
    assert!(r.outcomes[0].passed);
    // Even an empty expectation needs an actual line to match against.
    assert!(!r.outcomes[1].passed);
    assert_eq!(r.outcomes[1].actual, "");
    assert!(!r.all_passed);
  }

  #[test]
  fn extra_lines_are_ignored() {
    let r = reconcile(&cases(&[("a", "X")]), "X\nnoise\nmore noise\n");
    assert!(r.all_passed);
  }

  #[test]
  fn only_the_whole_stdout_is_trimmed() {
    // Trailing newline goes away with the overall trim...
    let r = reconcile(&cases(&[("a", "X"), ("b", "Y")]), "X\nY\n");
    assert!(r.all_passed);
    // ...but interior padding on a line is a real mismatch.
    let r = reconcile(&cases(&[("a", "X"), ("b", "Y")]), "X \nY\n");
    assert!(!r.outcomes[0].passed);
  }
}
