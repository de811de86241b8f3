//! Mode definitions and small helpers tied to them.

use crate::domain::ModeKey;
use crate::engine::clamp_difficulty;

pub const SPRINT_TIME_SECONDS: u32 = 60;
pub const BEST_KEY_PREFIX: &str = "numberSenseBest:";
/// Older builds stored the sprint best under this flat key; reads fold it
/// in and new sprint bests keep it in step.
pub const LEGACY_SPRINT_KEY: &str = "numberSenseSprintBestScore";

/// Static description of a play mode.
#[derive(Clone, Copy, Debug)]
pub struct ModeConfig {
  pub label: &'static str,
  pub tag: &'static str,
  pub subtitle: &'static str,
  pub has_timer: bool,
  pub starting_lives: Option<u32>,
}

pub fn mode_config(mode: ModeKey) -> ModeConfig {
  match mode {
    ModeKey::Sprint => ModeConfig {
      label: "Sprint",
      tag: "Sprint Mode",
      subtitle: "60-second mental math warm-up",
      has_timer: true,
      starting_lives: None,
    },
    ModeKey::Survival => ModeConfig {
      label: "Survival",
      tag: "Survival Mode",
      subtitle: "3 lives. Questions ramp up in difficulty.",
      has_timer: false,
      starting_lives: Some(3),
    },
  }
}

/// Storage key for a mode's best score.
pub fn best_key(mode: ModeKey) -> String {
  match mode {
    ModeKey::Sprint => format!("{}sprint", BEST_KEY_PREFIX),
    ModeKey::Survival => format!("{}survival", BEST_KEY_PREFIX),
  }
}

/// Difficulty for the next question. Survival ramps one level per `step`
/// correct answers; sprint stays at level 1.
pub fn ramp_difficulty(mode: ModeKey, total_correct: u32, step: u32) -> u32 {
  match mode {
    ModeKey::Survival => clamp_difficulty((1 + total_correct / step.max(1)) as f64),
    ModeKey::Sprint => 1,
  }
}
