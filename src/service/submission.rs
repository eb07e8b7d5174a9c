use chrono::Utc;
use reqwest::StatusCode;
use uuid::Uuid;

use crate::{
    config::app_config::CONFIG,
    db::{
        answer::insert_answer,
        leaderboard::upsert_answer_credit,
        participant::{apply_score, get_by_session_and_subject},
        quiz::get_questions,
        session::get_session,
    },
    models::{
        app_state::AppState,
        auth::SubjectId,
        error::ServerError,
        event::ChangeEvent,
        session::{
            Answer, QuizSession, ScoringSettings, SessionStatus, SubmitAnswerRequest,
            SubmitAnswerResponse,
        },
    },
    service::scoring::score_answer,
};

/// Validates, scores and records one student answer, then fans the change
/// out to the session's subscribers.
///
/// The answer row, the participant counters and the leaderboard aggregate
/// are written in one transaction; the answer insert doubles as the
/// idempotency guard, so a re-submission for an already answered question
/// rolls the whole event back as a conflict.
pub async fn submit_answer(
    state: &AppState,
    subject: SubjectId,
    session_id: Uuid,
    request: SubmitAnswerRequest,
) -> Result<SubmitAnswerResponse, ServerError> {
    let pool = state.get_pool();

    let session = get_session(pool, session_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Session {} does not exist", session_id)))?;

    let participant = get_by_session_and_subject(pool, session_id, subject.uuid())
        .await?
        .ok_or_else(|| ServerError::NotFound("Participant not found in session".into()))?;

    if session.status == SessionStatus::Finished {
        return Err(ServerError::Conflict("Session has already finished".into()));
    }

    let quiz_id = session.quiz_id;
    let questions = state
        .get_question_cache()
        .get_or(&session_id, async || get_questions(pool, quiz_id).await)
        .await?;

    if request.question_index > session.current_index {
        return Err(ServerError::Api(
            StatusCode::BAD_REQUEST,
            "Question is not active yet".into(),
        ));
    }

    let question = questions
        .get(request.question_index as usize)
        .ok_or_else(|| {
            ServerError::NotFound(format!("Question {} does not exist", request.question_index))
        })?;

    // The local countdown in the client is advisory only. Authority over the
    // deadline sits here, measured from the question's activation stamp.
    let late = is_past_deadline(&session, request.question_index);

    let is_correct = !late
        && request
            .selected_option_index
            .is_some_and(|selected| selected == question.correct_option_index);

    let outcome = score_answer(
        is_correct,
        request.answer_time_ms,
        participant.streak,
        &ScoringSettings::from(&session),
    );

    let answer = Answer {
        id: Uuid::new_v4(),
        session_id,
        participant_id: participant.id,
        question_index: request.question_index,
        selected_option: request.selected_option_index.map(|i| i.to_string()),
        is_correct,
        answer_time_ms: request.answer_time_ms,
        points_earned: outcome.points,
        created_at: Utc::now(),
    };

    let mut tx = pool.begin().await?;

    let inserted = insert_answer(&mut tx, &answer).await?;
    if !inserted {
        return Err(ServerError::Conflict(
            "Answer already submitted for this question".into(),
        ));
    }

    let (new_total_score, new_streak) = apply_score(
        &mut tx,
        participant.id,
        outcome.points,
        outcome.new_streak,
        is_correct,
    )
    .await?;

    upsert_answer_credit(&mut tx, subject.uuid(), outcome.points, is_correct).await?;

    tx.commit().await?;

    let notifier = state.get_notifier();
    notifier.publish(ChangeEvent::AnswerSubmitted {
        session_id,
        question_index: request.question_index,
    });
    notifier.publish(ChangeEvent::ParticipantUpdated {
        session_id,
        participant_id: participant.id,
        score: new_total_score,
        streak: new_streak,
    });

    Ok(SubmitAnswerResponse {
        is_correct,
        points_earned: outcome.points,
        new_total_score,
        new_streak,
        correct_answer: question.correct_option_index,
    })
}

/// A submission is late when its question has already been advanced past,
/// or when the server-observed elapsed time exceeds the timer plus the
/// configured grace.
fn is_past_deadline(session: &QuizSession, question_index: i32) -> bool {
    if question_index < session.current_index {
        return true;
    }

    let elapsed_ms = (Utc::now() - session.question_started_at).num_milliseconds();
    let limit_ms = session.question_timer_seconds as i64 * 1_000 + CONFIG.quiz.deadline_grace_ms;

    elapsed_ms > limit_ms
}
