//! Small utility helpers used across modules.

/// Log-safe truncation for large strings.
/// Counts chars, not bytes, so question text like "12 × 7" never splits
/// mid-character.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    return s.to_string();
  }
  let head: String = s.chars().take(max).collect();
  format!("{}… ({} bytes total)", head, s.len())
}

/// "correct / answered" label for scoreboards and round summaries.
pub fn accuracy_label(correct: u32, answered: u32) -> String {
  format!("{} / {}", correct, answered)
}
