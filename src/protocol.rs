//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{
    EndReason, EvaluationStatus, HistoryEntry, ModeKey, Question, StatsSnapshot,
};
use crate::modes::{mode_config, SPRINT_TIME_SECONDS};
use crate::state::{GameSession, RoundSummary, SubmitOutcome};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartRound {
        #[serde(default)]
        mode: ModeKey,
    },
    SubmitAnswer {
        #[serde(rename = "sessionId")]
        session_id: String,
        answer: String,
    },
    EndRound {
        #[serde(rename = "sessionId")]
        session_id: String,
        reason: EndReason,
    },
    SwitchMode {
        #[serde(rename = "sessionId")]
        session_id: String,
        mode: ModeKey,
    },
    BestScore {
        mode: ModeKey,
    },
    ResetBest {
        mode: ModeKey,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    RoundStarted {
        session: SessionOut,
        best: u32,
    },
    ModeSwitched {
        session: SessionOut,
        best: u32,
    },
    AnswerResult(AnswerOut),
    RoundEnded(SummaryOut),
    BestScore {
        mode: ModeKey,
        best: u32,
    },
    Error {
        message: String,
    },
}

/// Question DTO: the answer never leaves the server while a round runs.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub text: String,
    pub kind: crate::domain::QuestionType,
}

/// DTO used by both WS and HTTP for session delivery.
#[derive(Debug, Serialize)]
pub struct SessionOut {
    pub id: String,
    pub mode: ModeKey,
    pub stats: StatsSnapshot,
    pub lives: Option<u32>,
    pub difficulty: u32,
    pub running: bool,
    pub question: Option<QuestionOut>,
    pub history: Vec<HistoryEntry>,
}

/// Convert an internal `Question` to the public DTO.
pub fn question_to_out(q: &Question) -> QuestionOut {
    QuestionOut {
        text: q.text.clone(),
        kind: q.kind,
    }
}

/// Convert an internal session to the public DTO.
pub fn session_to_out(s: &GameSession) -> SessionOut {
    SessionOut {
        id: s.id.clone(),
        mode: s.mode,
        stats: s.stats,
        lives: s.lives,
        difficulty: s.difficulty,
        running: s.running,
        question: s.current_question.as_ref().map(question_to_out),
        history: s.history.clone(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct StartRoundIn {
    /// Defaults to sprint, the mode the game boots into.
    #[serde(default)]
    pub mode: ModeKey,
}

#[derive(Serialize)]
pub struct SessionStateOut {
    pub session: SessionOut,
    pub best: u32,
}

#[derive(Deserialize)]
pub struct AnswerIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub answer: String,
}

/// Evaluation result plus the mode side effects the client must render.
#[derive(Debug, Serialize)]
pub struct AnswerOut {
    pub status: EvaluationStatus,
    #[serde(rename = "parsedAnswer")]
    pub parsed_answer: Option<i64>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Option<i64>,
    pub stats: StatsSnapshot,
    pub question: Option<QuestionOut>,
    pub lives: Option<u32>,
    pub difficulty: u32,
    #[serde(rename = "roundOver")]
    pub round_over: bool,
    #[serde(rename = "newBest")]
    pub new_best: bool,
}

pub fn answer_to_out(o: &SubmitOutcome) -> AnswerOut {
    AnswerOut {
        status: o.evaluation.status,
        parsed_answer: o.evaluation.parsed_answer,
        correct_answer: o.correct_answer,
        stats: o.evaluation.stats,
        question: o.next_question.as_ref().map(question_to_out),
        lives: o.lives,
        difficulty: o.difficulty,
        round_over: o.round_over,
        new_best: o.new_best,
    }
}

#[derive(Deserialize)]
pub struct EndRoundIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub reason: EndReason,
}

#[derive(Debug, Serialize)]
pub struct SummaryOut {
    pub mode: ModeKey,
    pub reason: EndReason,
    pub stats: StatsSnapshot,
    pub best: u32,
    #[serde(rename = "newBest")]
    pub new_best: bool,
}

pub fn summary_to_out(s: &RoundSummary) -> SummaryOut {
    SummaryOut {
        mode: s.mode,
        reason: s.reason,
        stats: s.stats,
        best: s.best,
        new_best: s.new_best,
    }
}

#[derive(Deserialize)]
pub struct SwitchModeIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub mode: ModeKey,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct BestQuery {
    pub mode: ModeKey,
}

#[derive(Serialize)]
pub struct BestOut {
    pub mode: ModeKey,
    pub best: u32,
}

/// Static mode metadata for the frontend's mode switcher.
#[derive(Serialize)]
pub struct ModeOut {
    pub key: ModeKey,
    pub label: &'static str,
    pub tag: &'static str,
    pub subtitle: &'static str,
    #[serde(rename = "hasTimer")]
    pub has_timer: bool,
    #[serde(rename = "sprintSeconds")]
    pub sprint_seconds: Option<u32>,
    #[serde(rename = "startingLives")]
    pub starting_lives: Option<u32>,
}

pub fn mode_to_out(key: ModeKey) -> ModeOut {
    let cfg = mode_config(key);
    ModeOut {
        key,
        label: cfg.label,
        tag: cfg.tag,
        subtitle: cfg.subtitle,
        has_timer: cfg.has_timer,
        sprint_seconds: cfg.has_timer.then_some(SPRINT_TIME_SECONDS),
        starting_lives: cfg.starting_lives,
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
