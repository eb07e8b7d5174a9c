use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::session::SessionStatus;

/// Row-change notification fanned out to clients subscribed to a session.
/// Events carry just enough to tell subscribers what to re-fetch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    SessionUpdated {
        session_id: Uuid,
        status: SessionStatus,
        current_index: i32,
    },
    AnswerSubmitted {
        session_id: Uuid,
        question_index: i32,
    },
    ParticipantJoined {
        session_id: Uuid,
        participant_id: Uuid,
        nickname: String,
    },
    ParticipantUpdated {
        session_id: Uuid,
        participant_id: Uuid,
        score: i32,
        streak: i32,
    },
}

impl ChangeEvent {
    pub fn session_id(&self) -> Uuid {
        match self {
            ChangeEvent::SessionUpdated { session_id, .. }
            | ChangeEvent::AnswerSubmitted { session_id, .. }
            | ChangeEvent::ParticipantJoined { session_id, .. }
            | ChangeEvent::ParticipantUpdated { session_id, .. } => *session_id,
        }
    }
}
