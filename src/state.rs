//! Application state: round sessions, best-score store, and game tuning.
//!
//! This module owns:
//!   - the session map (one `GameSession` per active browser client)
//!   - the persisted best-score store
//!   - the loaded `GameConfig`
//!
//! All mode side effects live here: lives loss, survival difficulty ramping,
//! round termination, and best-score recording. The arithmetic itself is
//! delegated to the pure `engine` module, so every evaluation flows through
//! an explicit snapshot and an injectable randomness source.

use std::{collections::HashMap, sync::Arc};

use rand::Rng;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::best::BestScoreStore;
use crate::config::{load_game_config_from_env, GameConfig};
use crate::domain::{
    EndReason, Evaluation, EvaluationStatus, HistoryEntry, ModeKey, Question, StatsSnapshot,
};
use crate::engine::{evaluate_answer, generate_question};
use crate::modes::{mode_config, ramp_difficulty};

/// One client's round, kept server-side between messages.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub id: String,
    pub mode: ModeKey,
    pub stats: StatsSnapshot,
    pub lives: Option<u32>,
    pub difficulty: u32,
    pub current_question: Option<Question>,
    pub running: bool,
    pub history: Vec<HistoryEntry>,
}

impl GameSession {
    fn fresh(id: String, mode: ModeKey, config: &GameConfig) -> Self {
        let lives = mode_config(mode)
            .starting_lives
            .map(|_| config.survival_lives);
        Self {
            id,
            mode,
            stats: StatsSnapshot::default(),
            lives,
            difficulty: 1,
            current_question: None,
            running: false,
            history: Vec::new(),
        }
    }
}

/// Everything `submit_answer` decided, for the routes to serialize.
#[derive(Clone, Debug)]
pub struct SubmitOutcome {
    pub evaluation: Evaluation,
    pub correct_answer: Option<i64>,
    pub next_question: Option<Question>,
    pub lives: Option<u32>,
    pub difficulty: u32,
    pub round_over: bool,
    pub new_best: bool,
}

#[derive(Clone, Debug)]
pub struct RoundSummary {
    pub mode: ModeKey,
    pub reason: EndReason,
    pub stats: StatsSnapshot,
    pub best: u32,
    pub new_best: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<String, GameSession>>>,
    pub best: Arc<RwLock<BestScoreStore>>,
    pub config: GameConfig,
}

impl AppState {
    /// Build state from env: load tuning config and the best-score file.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_game_config_from_env().unwrap_or_default();
        Self::from_config(config)
    }

    pub fn from_config(config: GameConfig) -> Self {
        let best = BestScoreStore::load(config.best_scores_path.clone());
        info!(
            target: "numbersense_backend",
            sprint_seconds = config.sprint_seconds,
            survival_lives = config.survival_lives,
            difficulty_step = config.difficulty_step,
            "Game state initialized"
        );
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            best: Arc::new(RwLock::new(best)),
            config,
        }
    }

    fn draw_question(&self, difficulty: u32) -> Question {
        let mut rng = rand::thread_rng();
        generate_question(|| rng.gen::<f64>(), None, difficulty as f64)
    }

    /// Start a fresh round in `mode`. Any previous round under this session
    /// id is discarded.
    #[instrument(level = "info", skip(self), fields(?mode))]
    pub async fn start_round(&self, mode: ModeKey) -> GameSession {
        let id = Uuid::new_v4().to_string();
        let mut session = GameSession::fresh(id.clone(), mode, &self.config);
        session.running = true;
        session.current_question = Some(self.draw_question(session.difficulty));

        self.sessions
            .write()
            .await
            .insert(id.clone(), session.clone());
        info!(target: "round", %id, ?mode, "Round started");
        session
    }

    /// Read-only access to a session by id.
    pub async fn session(&self, id: &str) -> Option<GameSession> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Evaluate a submitted answer and apply mode side effects.
    ///
    /// Invalid input changes nothing: same question, same counters, no life
    /// lost. Otherwise the snapshot advances, survival may lose a life (and
    /// end the round at zero), difficulty re-ramps, and the next question is
    /// drawn unless the round just ended.
    #[instrument(level = "info", skip(self, raw), fields(%id, answer_len = raw.len()))]
    pub async fn submit_answer(&self, id: &str, raw: &str) -> Option<SubmitOutcome> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;
        if !session.running {
            warn!(target: "round", %id, "Answer submitted to a finished round");
            return None;
        }

        let evaluation = evaluate_answer(raw, session.current_question.as_ref(), session.stats);

        let question = match (evaluation.status, session.current_question.clone()) {
            (EvaluationStatus::Invalid, _) | (_, None) => {
                return Some(SubmitOutcome {
                    evaluation,
                    correct_answer: None,
                    next_question: session.current_question.clone(),
                    lives: session.lives,
                    difficulty: session.difficulty,
                    round_over: false,
                    new_best: false,
                });
            }
            (_, Some(q)) => q,
        };
        session.stats = evaluation.stats;

        let correct = evaluation.status == EvaluationStatus::Correct;
        if let Some(parsed) = evaluation.parsed_answer {
            session.history.insert(
                0,
                HistoryEntry {
                    question: question.text.clone(),
                    given_answer: parsed,
                    correct_answer: question.answer,
                    correct,
                },
            );
            session.history.truncate(self.config.history_limit);
        }

        if !correct && session.mode == ModeKey::Survival {
            let remaining = session.lives.unwrap_or(0).saturating_sub(1);
            session.lives = Some(remaining);
            info!(target: "round", %id, remaining, "Life lost");
        }

        session.difficulty = ramp_difficulty(
            session.mode,
            session.stats.total_correct,
            self.config.difficulty_step,
        );

        let round_over = session.mode == ModeKey::Survival && session.lives == Some(0);
        let mut new_best = false;
        if round_over {
            session.running = false;
            session.current_question = None;
            new_best = self
                .best
                .write()
                .await
                .record(session.mode, session.stats.score);
            info!(target: "round", %id, score = session.stats.score, "Round over: out of lives");
        } else {
            session.current_question = Some(self.draw_question(session.difficulty));
        }

        Some(SubmitOutcome {
            evaluation,
            correct_answer: Some(question.answer),
            next_question: session.current_question.clone(),
            lives: session.lives,
            difficulty: session.difficulty,
            round_over,
            new_best,
        })
    }

    /// Finalize a round. Sprint clients call this when their countdown hits
    /// zero; any client may end manually. Idempotent on finished rounds.
    #[instrument(level = "info", skip(self), fields(%id, ?reason))]
    pub async fn end_round(&self, id: &str, reason: EndReason) -> Option<RoundSummary> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;

        let mut new_best = false;
        if session.running {
            session.running = false;
            session.current_question = None;
            new_best = self
                .best
                .write()
                .await
                .record(session.mode, session.stats.score);
        }
        let best = self.best.write().await.best_for(session.mode);
        info!(target: "round", %id, ?reason, score = session.stats.score, best, "Round ended");

        Some(RoundSummary {
            mode: session.mode,
            reason,
            stats: session.stats,
            best,
            new_best,
        })
    }

    /// Switch a session to another mode: stops the round and resets all
    /// per-round state. A no-op when already in that mode.
    #[instrument(level = "info", skip(self), fields(%id, ?mode))]
    pub async fn switch_mode(&self, id: &str, mode: ModeKey) -> Option<GameSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;
        if session.mode == mode {
            return Some(session.clone());
        }
        *session = GameSession::fresh(session.id.clone(), mode, &self.config);
        info!(target: "round", %id, ?mode, "Mode switched");
        Some(session.clone())
    }

    /// Best score for a mode (legacy sprint key folded in).
    pub async fn best_score(&self, mode: ModeKey) -> u32 {
        self.best.write().await.best_for(mode)
    }

    pub async fn reset_best(&self, mode: ModeKey) -> u32 {
        let mut best = self.best.write().await;
        best.reset(mode);
        best.best_for(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        let config = GameConfig {
            best_scores_path: std::env::temp_dir()
                .join(format!("state-best-{}.json", Uuid::new_v4()))
                .display()
                .to_string(),
            ..GameConfig::default()
        };
        AppState::from_config(config)
    }

    async fn answer_correctly(state: &AppState, id: &str) -> SubmitOutcome {
        let answer = state
            .session(id)
            .await
            .unwrap()
            .current_question
            .unwrap()
            .answer;
        state.submit_answer(id, &answer.to_string()).await.unwrap()
    }

    #[tokio::test]
    async fn sprint_round_tracks_stats_and_serves_next_question() {
        let state = test_state();
        let session = state.start_round(ModeKey::Sprint).await;
        assert!(session.running);
        assert!(session.current_question.is_some());

        let out = answer_correctly(&state, &session.id).await;
        assert_eq!(out.evaluation.status, EvaluationStatus::Correct);
        assert_eq!(out.evaluation.stats.score, 1);
        assert!(out.next_question.is_some());
        assert!(!out.round_over);
        // Sprint never ramps.
        assert_eq!(out.difficulty, 1);
    }

    #[tokio::test]
    async fn invalid_input_costs_nothing() {
        let state = test_state();
        let session = state.start_round(ModeKey::Survival).await;
        let before = state.session(&session.id).await.unwrap();

        let out = state.submit_answer(&session.id, "abc").await.unwrap();
        assert_eq!(out.evaluation.status, EvaluationStatus::Invalid);
        assert_eq!(out.lives, before.lives);

        let after = state.session(&session.id).await.unwrap();
        assert_eq!(after.stats, before.stats);
        assert_eq!(after.current_question, before.current_question);
        assert!(after.history.is_empty());
    }

    #[tokio::test]
    async fn survival_ends_after_losing_all_lives() {
        let state = test_state();
        let session = state.start_round(ModeKey::Survival).await;
        assert_eq!(session.lives, Some(3));

        for expected_remaining in [2u32, 1] {
            let out = state.submit_answer(&session.id, "-999999").await.unwrap();
            assert_eq!(out.evaluation.status, EvaluationStatus::Wrong);
            assert_eq!(out.lives, Some(expected_remaining));
            assert!(!out.round_over);
        }

        let out = state.submit_answer(&session.id, "-999999").await.unwrap();
        assert_eq!(out.lives, Some(0));
        assert!(out.round_over);
        assert!(out.next_question.is_none());

        // Finished rounds refuse further answers.
        assert!(state.submit_answer(&session.id, "1").await.is_none());
    }

    #[tokio::test]
    async fn survival_difficulty_ramps_with_correct_answers() {
        let state = test_state();
        let session = state.start_round(ModeKey::Survival).await;

        for _ in 0..3 {
            let out = answer_correctly(&state, &session.id).await;
            assert_eq!(out.difficulty, 1);
        }
        let out = answer_correctly(&state, &session.id).await;
        assert_eq!(out.difficulty, 2);
    }

    #[tokio::test]
    async fn ending_a_round_records_the_best_score() {
        let state = test_state();
        let session = state.start_round(ModeKey::Sprint).await;
        answer_correctly(&state, &session.id).await;

        let summary = state
            .end_round(&session.id, EndReason::Time)
            .await
            .unwrap();
        assert_eq!(summary.stats.score, 1);
        assert_eq!(summary.best, 1);
        assert!(summary.new_best);

        // Ending again is idempotent and no longer a new best.
        let again = state
            .end_round(&session.id, EndReason::Manual)
            .await
            .unwrap();
        assert!(!again.new_best);
        assert_eq!(state.best_score(ModeKey::Sprint).await, 1);
    }

    #[tokio::test]
    async fn switching_modes_resets_the_round() {
        let state = test_state();
        let session = state.start_round(ModeKey::Sprint).await;
        answer_correctly(&state, &session.id).await;

        let switched = state
            .switch_mode(&session.id, ModeKey::Survival)
            .await
            .unwrap();
        assert_eq!(switched.mode, ModeKey::Survival);
        assert!(!switched.running);
        assert_eq!(switched.stats, StatsSnapshot::default());
        assert_eq!(switched.lives, Some(3));
        assert!(switched.current_question.is_none());
    }

    #[tokio::test]
    async fn history_is_bounded() {
        let config = GameConfig {
            history_limit: 2,
            best_scores_path: std::env::temp_dir()
                .join(format!("state-best-{}.json", Uuid::new_v4()))
                .display()
                .to_string(),
            ..GameConfig::default()
        };
        let state = AppState::from_config(config);
        let session = state.start_round(ModeKey::Sprint).await;

        for _ in 0..4 {
            answer_correctly(&state, &session.id).await;
        }
        let after = state.session(&session.id).await.unwrap();
        assert_eq!(after.history.len(), 2);
    }
}
