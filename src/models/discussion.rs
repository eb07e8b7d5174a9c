use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::validation::validate_title;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, sqlx::Type)]
#[sqlx(type_name = "vote_direction", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Discussion {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Discussion with its tallies aggregated from the vote log at read time,
/// so the net score can never drift from the recorded votes.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct DiscussionWithScore {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateDiscussionRequest {
    #[validate(custom(function = validate_title))]
    pub title: String,
    #[validate(length(min = 1, max = 5000, message = "Body must be 1-5000 characters"))]
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteRequest {
    pub direction: VoteDirection,
}

/// What a vote request resolved to, given the caller's existing vote.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum VoteOutcome {
    Added,
    Removed,
    Changed,
}

impl VoteOutcome {
    /// Same direction twice toggles the vote off, an opposite direction
    /// switches it, no prior vote adds one.
    pub fn resolve(existing: Option<VoteDirection>, requested: VoteDirection) -> Self {
        match existing {
            None => VoteOutcome::Added,
            Some(current) if current == requested => VoteOutcome::Removed,
            Some(_) => VoteOutcome::Changed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteResponse {
    pub outcome: VoteOutcome,
    pub score: i64,
}

#[derive(Debug, Serialize, Deserialize, Hash)]
pub struct DiscussionPageQuery {
    pub page_num: Option<u16>,
}
