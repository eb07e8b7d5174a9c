use sqlx::{Pool, Postgres};
use tracing::info;
use uuid::Uuid;

use crate::{
    db::{
        leaderboard::credit_completion,
        session::{
            advance_current_index, finish_participants, finish_session, get_session,
        },
    },
    models::{
        app_state::AppState,
        auth::SubjectId,
        error::ServerError,
        event::ChangeEvent,
        session::{AdvanceResponse, QuizSession, SessionStatus},
        system_log::{LogAction, LogSeverity},
    },
};

/// What an advance request should do, decided from the session row alone.
#[derive(Debug, PartialEq, Eq)]
pub enum AdvanceDecision {
    AlreadyFinished,
    MoveTo(i32),
    Finish,
}

/// The session state machine in one place: a finished session stays
/// finished, an active session with a next question moves forward by
/// exactly one, and the last question finalizes instead of yielding an
/// index.
pub fn decide_advance(session: &QuizSession) -> AdvanceDecision {
    if session.status == SessionStatus::Finished {
        return AdvanceDecision::AlreadyFinished;
    }

    if session.current_index + 1 < session.total_questions {
        AdvanceDecision::MoveTo(session.current_index + 1)
    } else {
        AdvanceDecision::Finish
    }
}

/// A quiz with a live session cannot have its questions replaced; running
/// sessions hold a total_questions snapshot and a cached question list
/// that would both go stale.
pub fn ensure_no_active_session(active: Option<&QuizSession>) -> Result<(), ServerError> {
    match active {
        Some(session) => Err(ServerError::Conflict(format!(
            "Quiz has an active session {}",
            session.id
        ))),
        None => Ok(()),
    }
}

/// Moves the session to its next question, or finalizes it when the current
/// question was the last one. Only the hosting mentor may advance.
///
/// The index bump is a single conditional update guarded on the session
/// being active and a next question existing, so the index can never move
/// backwards and a finished session is never resurrected.
pub async fn advance_question(
    state: &AppState,
    caller: Uuid,
    session_id: Uuid,
) -> Result<AdvanceResponse, ServerError> {
    let pool = state.get_pool();
    let session = require_hosted_session(pool, caller, session_id).await?;

    let finished = AdvanceResponse {
        finished: true,
        next_index: None,
    };

    match decide_advance(&session) {
        AdvanceDecision::AlreadyFinished => Ok(finished),
        AdvanceDecision::Finish => {
            finalize(state, &session).await?;
            Ok(finished)
        }
        AdvanceDecision::MoveTo(_) => match advance_current_index(pool, session_id).await? {
            Some(next_index) => {
                state.get_notifier().publish(ChangeEvent::SessionUpdated {
                    session_id,
                    status: SessionStatus::Active,
                    current_index: next_index,
                });

                Ok(AdvanceResponse {
                    finished: false,
                    next_index: Some(next_index),
                })
            }
            // Lost a race against a concurrent advance or end; the
            // conditional update stays authoritative over the stale read.
            None => {
                finalize(state, &session).await?;
                Ok(finished)
            }
        },
    }
}

/// Manual early stop. Idempotent: ending an already finished session is a
/// no-op.
pub async fn end_session(
    state: &AppState,
    caller: Uuid,
    session_id: Uuid,
) -> Result<(), ServerError> {
    let session = require_hosted_session(state.get_pool(), caller, session_id).await?;

    if session.status == SessionStatus::Finished {
        return Ok(());
    }

    finalize(state, &session).await?;
    Ok(())
}

/// Shared completion path. The status flip is conditional on the session
/// still being active; the per-participant completion bookkeeping only runs
/// when this call performed the flip, so a retried finalize cannot
/// double-count quizzes_completed.
async fn finalize(state: &AppState, session: &QuizSession) -> Result<bool, ServerError> {
    let pool = state.get_pool();
    let mut tx = pool.begin().await?;

    let flipped = finish_session(&mut tx, session.id).await?;
    if !flipped {
        return Ok(false);
    }

    finish_participants(&mut tx, session.id).await?;
    credit_completion(&mut tx, session.id).await?;
    tx.commit().await?;

    state.get_question_cache().invalidate(&session.id);
    state.get_notifier().publish(ChangeEvent::SessionUpdated {
        session_id: session.id,
        status: SessionStatus::Finished,
        current_index: session.current_index,
    });

    state
        .syslog()
        .subject(SubjectId::User(session.host_id))
        .action(LogAction::Update)
        .severity(LogSeverity::Info)
        .origin("finalize")
        .description(&format!("Quiz session {} finished", session.id))
        .log_async();

    info!("Session {} finished", session.id);
    Ok(true)
}

async fn require_hosted_session(
    pool: &Pool<Postgres>,
    caller: Uuid,
    session_id: Uuid,
) -> Result<QuizSession, ServerError> {
    let session = get_session(pool, session_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Session {} does not exist", session_id)))?;

    if session.host_id != caller {
        return Err(ServerError::AccessDenied);
    }

    Ok(session)
}
