use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cross-session running totals for one user. Rows are only ever touched
/// through atomic upsert increments, never read-modify-write.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct LeaderboardAggregate {
    pub user_id: Uuid,
    pub total_points: i64,
    pub quiz_points: i64,
    pub quizzes_completed: i32,
    pub correct_answers: i32,
    pub total_attempts: i32,
    pub last_activity: DateTime<Utc>,
}

/// Raw per-session standings row, before ranks are assigned.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct SessionStandingRow {
    pub participant_id: Uuid,
    pub nickname: String,
    pub score: i32,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionLeaderboardEntry {
    pub rank: u32,
    pub participant_id: Uuid,
    pub nickname: String,
    pub score: i32,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct GlobalLeaderboardEntry {
    pub user_id: Uuid,
    pub username: String,
    pub total_points: i64,
    pub quizzes_completed: i32,
    pub correct_answers: i32,
    pub total_attempts: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardPageQuery {
    pub page_num: Option<u16>,
}
