use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::validation::validate_team_name;

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub capacity: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct TeamWithCount {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub capacity: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub member_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(custom(function = validate_team_name))]
    pub name: String,
    #[validate(range(min = 1, max = 10, message = "Team capacity must be 1-10"))]
    pub capacity: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinTeamRequest {
    pub code: String,
}
