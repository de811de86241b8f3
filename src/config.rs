//! Loading game tuning (round lengths, lives, history cap) from TOML.
//!
//! See `GameConfig` for the expected schema. Every field has a default, so
//! an absent or partial file never blocks startup.

use serde::Deserialize;
use tracing::{info, error};

/// Tunables for the drill. Defaults reproduce the classic game: 60-second
/// sprint, 3 survival lives, a level per 4 correct answers, 25 history rows.
#[derive(Clone, Debug, Deserialize)]
pub struct GameConfig {
  #[serde(default = "default_sprint_seconds")]
  pub sprint_seconds: u32,
  #[serde(default = "default_survival_lives")]
  pub survival_lives: u32,
  #[serde(default = "default_difficulty_step")]
  pub difficulty_step: u32,
  #[serde(default = "default_history_limit")]
  pub history_limit: usize,
  #[serde(default = "default_best_scores_path")]
  pub best_scores_path: String,
}

fn default_sprint_seconds() -> u32 { crate::modes::SPRINT_TIME_SECONDS }
fn default_survival_lives() -> u32 { 3 }
fn default_difficulty_step() -> u32 { 4 }
fn default_history_limit() -> usize { 25 }
fn default_best_scores_path() -> String { "./best_scores.json".into() }

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      sprint_seconds: default_sprint_seconds(),
      survival_lives: default_survival_lives(),
      difficulty_step: default_difficulty_step(),
      history_limit: default_history_limit(),
      best_scores_path: default_best_scores_path(),
    }
  }
}

/// Attempt to load `GameConfig` from GAME_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_game_config_from_env() -> Option<GameConfig> {
  let path = std::env::var("GAME_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<GameConfig>(&s) {
      Ok(cfg) => {
        info!(target: "numbersense_backend", %path, "Loaded game config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "numbersense_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "numbersense_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
