//! Domain models used by the backend: question types, questions, stats
//! snapshots, evaluation outcomes, and play modes.

use serde::{Deserialize, Serialize};

/// The four question families the generator can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
  /// Two-digit addition, range widens with difficulty.
  Add,
  /// Same ranges as addition; operands ordered so the result is non-negative.
  Sub,
  /// Single-digit by single-digit multiplication.
  Mul1,
  /// Two-digit by one-digit multiplication.
  Mul2,
}

/// Universe the generator picks from when no type is forced.
pub const QUESTION_TYPES: [QuestionType; 4] = [
  QuestionType::Add,
  QuestionType::Sub,
  QuestionType::Mul1,
  QuestionType::Mul2,
];

/// A generated question. Immutable once created; discarded when the next
/// one is generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub text: String,
  pub answer: i64,
  pub kind: QuestionType,
}

/// Running counters for a round. Produced fresh by the evaluator on each
/// call, never mutated in place. Missing fields on the wire default to 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
  #[serde(default)]
  pub score: u32,
  #[serde(default)]
  pub streak: u32,
  #[serde(default, rename = "totalAnswered")]
  pub total_answered: u32,
  #[serde(default, rename = "totalCorrect")]
  pub total_correct: u32,
}

/// Classification of a submitted answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
  /// Input did not parse to an integer, or there was no active question.
  Invalid,
  Correct,
  Wrong,
}

/// Sole return value of evaluation: outcome, the parsed answer (if any),
/// and the updated snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
  pub status: EvaluationStatus,
  pub parsed_answer: Option<i64>,
  pub stats: StatsSnapshot,
}

/// Which game is being played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKey {
  /// 60-second timed sprint.
  Sprint,
  /// Lives-based survival with ramping difficulty.
  Survival,
}
impl Default for ModeKey {
  fn default() -> Self { ModeKey::Sprint }
}

/// Why a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
  Time,
  OutOfLives,
  Manual,
}

/// One line of the per-round history log (most recent first, bounded).
#[derive(Clone, Debug, Serialize)]
pub struct HistoryEntry {
  pub question: String,
  #[serde(rename = "givenAnswer")]
  pub given_answer: i64,
  #[serde(rename = "correctAnswer")]
  pub correct_answer: i64,
  pub correct: bool,
}
