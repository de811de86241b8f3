//! Per-mode best-score persistence.
//!
//! Scores live in a small JSON object on disk, one entry per storage key
//! (`numberSenseBest:sprint`, `numberSenseBest:survival`). Reads tolerate a
//! missing or corrupt file; writes are logged and non-fatal. The sprint best
//! also honors the legacy flat key from older builds: it is folded in via
//! max on read and kept in step on every new sprint best.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::domain::ModeKey;
use crate::modes::{best_key, LEGACY_SPRINT_KEY};

#[derive(Debug)]
pub struct BestScoreStore {
  path: PathBuf,
  scores: HashMap<String, u32>,
}

impl BestScoreStore {
  /// Load the store from `path`. A missing file yields an empty store; a
  /// corrupt one is logged and treated as empty.
  pub fn load(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    let scores = match std::fs::read_to_string(&path) {
      Ok(s) => match serde_json::from_str::<HashMap<String, u32>>(&s) {
        Ok(map) => {
          info!(target: "numbersense_backend", path = %path.display(), entries = map.len(), "Loaded best scores");
          map
        }
        Err(e) => {
          error!(target: "numbersense_backend", path = %path.display(), error = %e, "Corrupt best-score file; starting empty");
          HashMap::new()
        }
      },
      Err(_) => HashMap::new(),
    };
    Self { path, scores }
  }

  fn persist(&self) {
    match serde_json::to_string_pretty(&self.scores) {
      Ok(s) => {
        if let Err(e) = std::fs::write(&self.path, s) {
          error!(target: "numbersense_backend", path = %self.path.display(), error = %e, "Failed to write best scores");
        }
      }
      Err(e) => {
        error!(target: "numbersense_backend", error = %e, "Failed to serialize best scores");
      }
    }
  }

  /// Current best for a mode. For sprint, the legacy key is folded in via
  /// max and the keyed entry is upgraded if the legacy value wins.
  pub fn best_for(&mut self, mode: ModeKey) -> u32 {
    let key = best_key(mode);
    let stored = self.scores.get(&key).copied().unwrap_or(0);
    if mode != ModeKey::Sprint {
      return stored;
    }
    let legacy = self.scores.get(LEGACY_SPRINT_KEY).copied().unwrap_or(0);
    let best = stored.max(legacy);
    if best > stored {
      warn!(target: "numbersense_backend", %key, legacy, "Migrating legacy sprint best");
      self.scores.insert(key, best);
      self.persist();
    }
    best
  }

  /// Record a finished round's score. Returns true when it beats the stored
  /// best (and was persisted).
  pub fn record(&mut self, mode: ModeKey, score: u32) -> bool {
    let best = self.best_for(mode);
    if score <= best {
      return false;
    }
    self.scores.insert(best_key(mode), score);
    if mode == ModeKey::Sprint {
      self.scores.insert(LEGACY_SPRINT_KEY.to_string(), score);
    }
    self.persist();
    info!(target: "round", ?mode, score, "New personal best");
    true
  }

  /// Forget the best for a mode (sprint also clears the legacy key).
  pub fn reset(&mut self, mode: ModeKey) {
    self.scores.remove(&best_key(mode));
    if mode == ModeKey::Sprint {
      self.scores.remove(LEGACY_SPRINT_KEY);
    }
    self.persist();
  }
}
