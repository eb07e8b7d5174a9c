use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::validation::validate_nickname,
    config::app_config::CONFIG,
    models::quiz::{QuestionView, StudentQuestionView},
};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Finished,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, sqlx::Type)]
#[sqlx(type_name = "participant_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Active,
    Finished,
}

/// One live run of a published quiz. `current_index` only moves forward and
/// `finished` is terminal.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct QuizSession {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub host_id: Uuid,
    pub status: SessionStatus,
    pub current_index: i32,
    pub total_questions: i32,
    pub points_per_question: i32,
    pub question_timer_seconds: i32,
    pub speed_bonus_enabled: bool,
    pub max_speed_bonus: i32,
    pub streak_multiplier_enabled: bool,
    /// Server-side activation stamp of the current question, used to reject
    /// late submissions regardless of the client-reported elapsed time.
    pub question_started_at: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Scoring inputs snapshotted from a session row.
#[derive(Debug, Clone, Copy)]
pub struct ScoringSettings {
    pub points_per_question: i32,
    pub question_timer_seconds: i32,
    pub speed_bonus_enabled: bool,
    pub max_speed_bonus: i32,
    pub streak_multiplier_enabled: bool,
}

impl From<&QuizSession> for ScoringSettings {
    fn from(session: &QuizSession) -> Self {
        Self {
            points_per_question: session.points_per_question,
            question_timer_seconds: session.question_timer_seconds,
            speed_bonus_enabled: session.speed_bonus_enabled,
            max_speed_bonus: session.max_speed_bonus,
            streak_multiplier_enabled: session.streak_multiplier_enabled,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub session_id: Uuid,
    pub subject_id: Uuid,
    pub nickname: String,
    pub score: i32,
    pub streak: i32,
    pub longest_streak: i32,
    pub correct_count: i32,
    pub answered_count: i32,
    pub status: ParticipantStatus,
    pub joined_at: DateTime<Utc>,
}

/// Immutable record of one submitted answer. The selected option is stored
/// as text and parsed back into an option bucket for statistics.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Answer {
    pub id: Uuid,
    pub session_id: Uuid,
    pub participant_id: Uuid,
    pub question_index: i32,
    pub selected_option: Option<String>,
    pub is_correct: bool,
    pub answer_time_ms: i64,
    pub points_earned: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct StartSessionRequest {
    pub quiz_id: Uuid,
    #[validate(range(min = 0, message = "Points per question cannot be negative"))]
    pub points_per_question: Option<i32>,
    #[validate(range(min = 1, message = "Question timer must be at least one second"))]
    pub question_timer_seconds: Option<i32>,
    pub speed_bonus_enabled: Option<bool>,
    #[validate(range(min = 0, message = "Speed bonus cannot be negative"))]
    pub max_speed_bonus: Option<i32>,
    pub streak_multiplier_enabled: Option<bool>,
}

impl StartSessionRequest {
    /// Fills unset settings from the configured defaults.
    pub fn settings(&self) -> ScoringSettings {
        ScoringSettings {
            points_per_question: self
                .points_per_question
                .unwrap_or(CONFIG.quiz.points_per_question),
            question_timer_seconds: self
                .question_timer_seconds
                .unwrap_or(CONFIG.quiz.question_timer_seconds),
            speed_bonus_enabled: self.speed_bonus_enabled.unwrap_or(true),
            max_speed_bonus: self.max_speed_bonus.unwrap_or(CONFIG.quiz.max_speed_bonus),
            streak_multiplier_enabled: self.streak_multiplier_enabled.unwrap_or(true),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct JoinSessionRequest {
    pub code: String,
    #[validate(custom(function = validate_nickname))]
    pub nickname: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    pub question_index: i32,
    pub selected_option_index: Option<i32>,
    #[validate(range(min = 0, message = "Answer time cannot be negative"))]
    pub answer_time_ms: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SubmitAnswerResponse {
    pub is_correct: bool,
    pub points_earned: i32,
    pub new_total_score: i32,
    pub new_streak: i32,
    pub correct_answer: i32,
}

#[derive(Debug, Serialize)]
pub struct CurrentQuestionResponse {
    pub session: QuizSession,
    pub question: QuestionView,
    pub index: i32,
    pub total: i32,
}

#[derive(Debug, Serialize)]
pub struct StudentQuestionResponse {
    pub session: QuizSession,
    pub participant: Participant,
    pub question: StudentQuestionView,
    pub question_index: i32,
    pub total_questions: i32,
    pub has_answered: bool,
    pub answer: Option<Answer>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AdvanceResponse {
    pub finished: bool,
    pub next_index: Option<i32>,
}

/// Per-option answer distribution for one question of a session. Buckets
/// cover option indices 0-3; unparseable or empty selections are excluded
/// from the buckets but still count toward `total`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AnswerStats {
    pub option_counts: [i64; 4],
    pub total: i64,
    pub correct_count: i64,
}
