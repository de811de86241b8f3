//! Pure question generation and answer evaluation.
//!
//! Flow:
//! 1) Difficulty is clamped into [1, MAX_DIFFICULTY].
//! 2) Per-family operand ranges are derived from the clamped level.
//! 3) `generate_question` draws operands from an injected randomness source
//!    ([type draw if unforced] -> operand a -> operand b; the order is fixed
//!    so a seeded source reproduces questions exactly).
//! 4) `parse_integer_answer` + `evaluate_answer` turn raw input and a prior
//!    snapshot into a fresh snapshot and an outcome.
//!
//! Nothing here touches storage, the clock, or shared state; every function
//! is fully determined by its arguments.

use crate::domain::{Evaluation, EvaluationStatus, Question, QuestionType, StatsSnapshot, QUESTION_TYPES};

pub const MAX_DIFFICULTY: u32 = 6;

/// Clamp an arbitrary numeric difficulty into [1, MAX_DIFFICULTY].
/// Non-finite input falls back to 1.
pub fn clamp_difficulty(value: f64) -> u32 {
  if !value.is_finite() {
    return 1;
  }
  let floored = value.floor();
  if floored < 1.0 {
    1
  } else if floored > MAX_DIFFICULTY as f64 {
    MAX_DIFFICULTY
  } else {
    floored as u32
  }
}

/// Operand range shared by addition and subtraction.
pub fn addition_range(level: u32) -> (i64, i64) {
  let boost = level.saturating_sub(1) as i64;
  (10 + boost * 8, 99 + boost * 25)
}

/// Operand range for the single-digit multiplication family.
/// Growth caps out so high levels stay mentally computable.
pub fn single_digit_range(level: u32) -> (i64, i64) {
  let boost = level.saturating_sub(1) as i64;
  (2 + boost.min(4), 9 + (boost * 2).min(8))
}

/// Ranges for the two-digit-by-one-digit multiplication family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MulTwoRanges {
  pub first_min: i64,
  pub first_max: i64,
  pub second_min: i64,
  pub second_max: i64,
}

pub fn multi_digit_times_single_range(level: u32) -> MulTwoRanges {
  let boost = level.saturating_sub(1) as i64;
  MulTwoRanges {
    first_min: 10 + boost * 12,
    first_max: 99 + boost * 22,
    second_min: 2 + boost.min(3),
    second_max: 9 + boost.min(5),
  }
}

/// Uniform integer in [min, max] inclusive. `rng` must yield reals in [0, 1).
/// This is the single point where randomness is consumed.
pub fn random_int<F: FnMut() -> f64>(min: i64, max: i64, rng: &mut F) -> i64 {
  (rng() * (max - min + 1) as f64).floor() as i64 + min
}

fn fallback_question() -> Question {
  Question {
    text: "1 + 1".into(),
    answer: 2,
    kind: QuestionType::Add,
  }
}

/// Generate one question.
///
/// `rng` yields uniform reals in [0, 1); injecting a scripted source makes
/// generation reproducible. When `forced` is None the type is drawn first,
/// then operand a, then operand b. A randomness source stepping outside
/// [0, 1) on the type draw yields the fixed fallback question instead of
/// panicking.
pub fn generate_question<F: FnMut() -> f64>(
  mut rng: F,
  forced: Option<QuestionType>,
  difficulty: f64,
) -> Question {
  let kind = match forced {
    Some(k) => k,
    None => {
      let idx = random_int(0, QUESTION_TYPES.len() as i64 - 1, &mut rng);
      match usize::try_from(idx).ok().and_then(|i| QUESTION_TYPES.get(i)) {
        Some(k) => *k,
        None => return fallback_question(),
      }
    }
  };
  let level = clamp_difficulty(difficulty);

  match kind {
    QuestionType::Add => {
      let (min, max) = addition_range(level);
      let a = random_int(min, max, &mut rng);
      let b = random_int(min, max, &mut rng);
      Question { text: format!("{} + {}", a, b), answer: a + b, kind }
    }
    QuestionType::Sub => {
      let (min, max) = addition_range(level);
      let mut a = random_int(min, max, &mut rng);
      let mut b = random_int(min, max, &mut rng);
      // Keep the result non-negative; the larger operand prints first.
      if b > a {
        std::mem::swap(&mut a, &mut b);
      }
      Question { text: format!("{} - {}", a, b), answer: a - b, kind }
    }
    QuestionType::Mul1 => {
      let (min, max) = single_digit_range(level);
      let a = random_int(min, max, &mut rng);
      let b = random_int(min, max, &mut rng);
      Question { text: format!("{} × {}", a, b), answer: a * b, kind }
    }
    QuestionType::Mul2 => {
      let r = multi_digit_times_single_range(level);
      let a = random_int(r.first_min, r.first_max, &mut rng);
      let b = random_int(r.second_min, r.second_max, &mut rng);
      Question { text: format!("{} × {}", a, b), answer: a * b, kind }
    }
  }
}

/// Parse free-form input into an integer answer.
///
/// Trims surrounding whitespace; empty input is None. Numeric conversion
/// accepts anything that denotes a mathematical integer ("8", "-7", "3.0",
/// "1e3") and rejects fractions, text, and non-finite values.
pub fn parse_integer_answer(raw: &str) -> Option<i64> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }
  let value: f64 = trimmed.parse().ok()?;
  if !value.is_finite() || value.fract() != 0.0 {
    return None;
  }
  if value < i64::MIN as f64 || value > i64::MAX as f64 {
    return None;
  }
  Some(value as i64)
}

/// Evaluate raw input against the current question.
///
/// Pure transform: the prior snapshot is copied, never mutated. Unparsable
/// input or a missing question leaves the counters untouched; otherwise
/// `total_answered` always increments, and a correct answer additionally
/// bumps score, streak, and `total_correct` while a wrong one zeroes the
/// streak.
pub fn evaluate_answer(
  raw: &str,
  current_question: Option<&Question>,
  prior: StatsSnapshot,
) -> Evaluation {
  let parsed_answer = parse_integer_answer(raw);

  let (parsed, question) = match (parsed_answer, current_question) {
    (Some(p), Some(q)) => (p, q),
    _ => {
      return Evaluation { status: EvaluationStatus::Invalid, parsed_answer, stats: prior };
    }
  };

  let mut stats = prior;
  stats.total_answered += 1;

  if parsed == question.answer {
    stats.score += 1;
    stats.streak += 1;
    stats.total_correct += 1;
    Evaluation { status: EvaluationStatus::Correct, parsed_answer, stats }
  } else {
    stats.streak = 0;
    Evaluation { status: EvaluationStatus::Wrong, parsed_answer, stats }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn constant(v: f64) -> impl FnMut() -> f64 {
    move || v
  }

  /// Scripted source: yields the given values in order, then repeats the last.
  fn scripted(values: Vec<f64>) -> impl FnMut() -> f64 {
    let mut i = 0;
    move || {
      let v = values[i.min(values.len() - 1)];
      i += 1;
      v
    }
  }

  fn operands_of(text: &str) -> (i64, i64) {
    let mut parts = text.split_whitespace();
    let a = parts.next().unwrap().parse().unwrap();
    let _op = parts.next().unwrap();
    let b = parts.next().unwrap().parse().unwrap();
    (a, b)
  }

  #[test]
  fn clamp_difficulty_bounds_and_floor() {
    assert_eq!(clamp_difficulty(0.0), 1);
    assert_eq!(clamp_difficulty(1.0), 1);
    assert_eq!(clamp_difficulty(3.7), 3);
    assert_eq!(clamp_difficulty(6.0), 6);
    assert_eq!(clamp_difficulty(42.0), 6);
    assert_eq!(clamp_difficulty(-5.0), 1);
  }

  #[test]
  fn clamp_difficulty_rejects_non_finite() {
    assert_eq!(clamp_difficulty(f64::NAN), 1);
    assert_eq!(clamp_difficulty(f64::INFINITY), 1);
    assert_eq!(clamp_difficulty(f64::NEG_INFINITY), 1);
  }

  #[test]
  fn clamp_difficulty_is_idempotent() {
    for x in [-3.0, 0.0, 1.2, 2.9, 6.0, 6.1, 100.0] {
      let once = clamp_difficulty(x);
      assert_eq!(clamp_difficulty(once as f64), once);
    }
  }

  #[test]
  fn ranges_match_level_one() {
    assert_eq!(addition_range(1), (10, 99));
    assert_eq!(single_digit_range(1), (2, 9));
    let r = multi_digit_times_single_range(1);
    assert_eq!((r.first_min, r.first_max, r.second_min, r.second_max), (10, 99, 2, 9));
  }

  #[test]
  fn ranges_widen_with_level() {
    assert_eq!(addition_range(6), (50, 224));
    // Single-digit growth caps: min at boost 4, max term at 8.
    assert_eq!(single_digit_range(6), (6, 17));
    let r = multi_digit_times_single_range(6);
    assert_eq!((r.first_min, r.first_max, r.second_min, r.second_max), (70, 209, 5, 14));

    for level in 1..MAX_DIFFICULTY {
      let (lo_min, lo_max) = addition_range(level);
      let (hi_min, hi_max) = addition_range(level + 1);
      assert!(hi_min >= lo_min && hi_max >= lo_max);
    }
  }

  #[test]
  fn random_int_hits_inclusive_bounds() {
    let mut zero = constant(0.0);
    assert_eq!(random_int(10, 99, &mut zero), 10);
    let mut near_one = constant(0.999_999);
    assert_eq!(random_int(10, 99, &mut near_one), 99);
  }

  #[test]
  fn generation_is_deterministic() {
    for kind in QUESTION_TYPES {
      for level in 1..=MAX_DIFFICULTY {
        let first = generate_question(scripted(vec![0.3, 0.8]), Some(kind), level as f64);
        let second = generate_question(scripted(vec![0.3, 0.8]), Some(kind), level as f64);
        assert_eq!(first, second);
      }
    }
  }

  #[test]
  fn unforced_type_draw_comes_first() {
    // First draw selects the type: floor(0.8 * 4) = 3 -> mul2.
    let q = generate_question(scripted(vec![0.8, 0.0, 0.0]), None, 1.0);
    assert_eq!(q.kind, QuestionType::Mul2);
    assert_eq!(q.text, "10 × 2");

    // floor(0.0 * 4) = 0 -> add, then both operands at the minimum.
    let q = generate_question(constant(0.0), None, 1.0);
    assert_eq!(q.kind, QuestionType::Add);
    assert_eq!(q.text, "10 + 10");
  }

  #[test]
  fn misbehaving_source_falls_back() {
    // A source outside [0, 1) would index past the type universe.
    let q = generate_question(constant(1.5), None, 1.0);
    assert_eq!(q.text, "1 + 1");
    assert_eq!(q.answer, 2);
    assert_eq!(q.kind, QuestionType::Add);
  }

  #[test]
  fn addition_operands_within_range() {
    for level in 1..=MAX_DIFFICULTY {
      let q = generate_question(scripted(vec![0.1, 0.9]), Some(QuestionType::Add), level as f64);
      let (a, b) = operands_of(&q.text);
      let (min, max) = addition_range(level);
      assert!(a >= min && a <= max);
      assert!(b >= min && b <= max);
      assert_eq!(q.answer, a + b);
    }
  }

  #[test]
  fn subtraction_never_goes_negative() {
    // Draw order is a then b; b > a must swap so the bigger prints first.
    let q = generate_question(scripted(vec![0.0, 0.9]), Some(QuestionType::Sub), 1.0);
    let (a, b) = operands_of(&q.text);
    assert!(a >= b);
    assert!(q.answer >= 0);
    assert_eq!(q.answer, a - b);
  }

  #[test]
  fn subtraction_at_zero_source() {
    // rng() = 0 pins both draws to the range minimum.
    let q = generate_question(constant(0.0), Some(QuestionType::Sub), 1.0);
    assert_eq!(q.text, "10 - 10");
    assert_eq!(q.answer, 0);
  }

  #[test]
  fn multiplication_operands_within_range() {
    for level in 1..=MAX_DIFFICULTY {
      let q = generate_question(scripted(vec![0.5, 0.5]), Some(QuestionType::Mul1), level as f64);
      let (a, b) = operands_of(&q.text);
      let (min, max) = single_digit_range(level);
      assert!(a >= min && a <= max && b >= min && b <= max);
      assert_eq!(q.answer, a * b);

      let q = generate_question(scripted(vec![0.5, 0.5]), Some(QuestionType::Mul2), level as f64);
      let (a, b) = operands_of(&q.text);
      let r = multi_digit_times_single_range(level);
      assert!(a >= r.first_min && a <= r.first_max);
      assert!(b >= r.second_min && b <= r.second_max);
      assert_eq!(q.answer, a * b);
    }
  }

  #[test]
  fn non_finite_difficulty_defaults_to_level_one() {
    let q = generate_question(constant(0.0), Some(QuestionType::Add), f64::NAN);
    assert_eq!(q.text, "10 + 10");
  }

  #[test]
  fn parse_round_trips_integers() {
    for n in [-1_000_000i64, -7, 0, 8, 42, 999_999] {
      assert_eq!(parse_integer_answer(&n.to_string()), Some(n));
    }
  }

  #[test]
  fn parse_tolerates_whitespace_and_integral_floats() {
    assert_eq!(parse_integer_answer("  8  "), Some(8));
    assert_eq!(parse_integer_answer("3.0"), Some(3));
    assert_eq!(parse_integer_answer("1e3"), Some(1000));
    assert_eq!(parse_integer_answer("+7"), Some(7));
  }

  #[test]
  fn parse_rejects_garbage() {
    for raw in ["", "   ", "3.5", "abc", "Infinity", "inf", "NaN", "1 2"] {
      assert_eq!(parse_integer_answer(raw), None, "should reject {:?}", raw);
    }
  }

  fn sample_question() -> Question {
    Question { text: "5 + 3".into(), answer: 8, kind: QuestionType::Add }
  }

  fn prior() -> StatsSnapshot {
    StatsSnapshot { score: 2, streak: 2, total_answered: 5, total_correct: 3 }
  }

  #[test]
  fn correct_answer_bumps_all_counters() {
    let out = evaluate_answer("8", Some(&sample_question()), prior());
    assert_eq!(out.status, EvaluationStatus::Correct);
    assert_eq!(out.parsed_answer, Some(8));
    assert_eq!(
      out.stats,
      StatsSnapshot { score: 3, streak: 3, total_answered: 6, total_correct: 4 }
    );
  }

  #[test]
  fn wrong_answer_resets_streak_only() {
    let out = evaluate_answer("7", Some(&sample_question()), prior());
    assert_eq!(out.status, EvaluationStatus::Wrong);
    assert_eq!(out.parsed_answer, Some(7));
    assert_eq!(
      out.stats,
      StatsSnapshot { score: 2, streak: 0, total_answered: 6, total_correct: 3 }
    );
  }

  #[test]
  fn unparsable_input_leaves_stats_untouched() {
    let out = evaluate_answer("abc", Some(&sample_question()), prior());
    assert_eq!(out.status, EvaluationStatus::Invalid);
    assert_eq!(out.parsed_answer, None);
    assert_eq!(out.stats, prior());
  }

  #[test]
  fn missing_question_is_invalid_even_with_parsable_input() {
    let out = evaluate_answer("8", None, prior());
    assert_eq!(out.status, EvaluationStatus::Invalid);
    assert_eq!(out.parsed_answer, Some(8));
    assert_eq!(out.stats, prior());
  }

  #[test]
  fn evaluation_preserves_counter_invariant() {
    let q = sample_question();
    let mut stats = StatsSnapshot::default();
    for raw in ["8", "7", "x", "8", "", "9", "8"] {
      let out = evaluate_answer(raw, Some(&q), stats);
      assert!(out.stats.total_correct <= out.stats.total_answered);
      stats = out.stats;
    }
    assert_eq!(stats.total_answered, 5);
    assert_eq!(stats.total_correct, 3);
  }
}
