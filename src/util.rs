//! Small utility helpers used across modules.

/// Display name derived from an email address: everything before the '@'.
/// Falls back to the whole string when there is no '@'.
pub fn username_from_email(email: &str) -> String {
  email.split('@').next().unwrap_or(email).to_string()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max { s.to_string() } else { format!("{}… ({} bytes total)", &s[..max], s.len()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn username_is_local_part() {
    assert_eq!(username_from_email("alice@example.com"), "alice");
    assert_eq!(username_from_email("no-at-sign"), "no-at-sign");
  }
}
