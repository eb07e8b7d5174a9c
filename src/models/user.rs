use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::leaderboard::LeaderboardAggregate;

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct BaseUser {
    pub id: Uuid,
    pub username: String,
    pub auth0_id: Option<String>,
    pub is_guest: bool,
    pub created_at: DateTime<Utc>,
}

/// Profile view. The points summary is read straight from the leaderboard
/// aggregate row instead of a separately stored counter.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: BaseUser,
    pub stats: Option<LeaderboardAggregate>,
}
