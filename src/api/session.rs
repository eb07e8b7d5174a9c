use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use reqwest::StatusCode;
use uuid::Uuid;

use tracing::{info, warn};

use crate::{
    api::validation::ValidatedJson,
    db::{
        answer::{get_answer, get_answer_rows},
        participant::{create_participant, get_by_session_and_subject, get_standings},
        quiz::{get_questions, get_quiz, get_quiz_by_code},
        session::{create_session, get_active_session_by_quiz, get_session},
    },
    models::{
        app_state::AppState,
        auth::SubjectId,
        error::ServerError,
        event::ChangeEvent,
        quiz::QuizStatus,
        session::{
            CurrentQuestionResponse, JoinSessionRequest, Participant, ParticipantStatus,
            QuizSession, SessionStatus, StartSessionRequest, StudentQuestionResponse,
            SubmitAnswerRequest,
        },
    },
    service::{
        session_controller::{advance_question, end_session},
        standings::{assign_ranks, fold_answer_stats},
        submission::submit_answer,
    },
};

pub fn session_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start))
        .route("/join", post(join))
        .route("/{session_id}/question", get(current_question))
        .route("/{session_id}/student-question", get(student_question))
        .route("/{session_id}/advance", post(advance))
        .route("/{session_id}/end", post(end))
        .route("/{session_id}/answers", post(answer))
        .route("/{session_id}/leaderboard", get(leaderboard))
        .route("/{session_id}/stats/{question_index}", get(answer_stats))
        .with_state(state.clone())
}

async fn start(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    ValidatedJson(request): ValidatedJson<StartSessionRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(host_id) = subject_id else {
        return Err(ServerError::AccessDenied);
    };

    let pool = state.get_pool();
    let quiz = get_quiz(pool, request.quiz_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Quiz {} does not exist", request.quiz_id)))?;

    if quiz.mentor_id != host_id {
        return Err(ServerError::AccessDenied);
    }

    if quiz.status != QuizStatus::Published {
        return Err(ServerError::Api(
            StatusCode::BAD_REQUEST,
            "Only published quizzes can be run live".into(),
        ));
    }

    if let Some(running) = get_active_session_by_quiz(pool, quiz.id).await? {
        return Err(ServerError::Conflict(format!(
            "Quiz already has an active session {}",
            running.id
        )));
    }

    let questions = get_questions(pool, quiz.id).await?;
    if questions.is_empty() {
        return Err(ServerError::Api(
            StatusCode::BAD_REQUEST,
            "Cannot start a session without questions".into(),
        ));
    }

    let settings = request.settings();
    let now = Utc::now();

    let session = QuizSession {
        id: Uuid::new_v4(),
        quiz_id: quiz.id,
        host_id,
        status: SessionStatus::Active,
        current_index: 0,
        total_questions: questions.len() as i32,
        points_per_question: settings.points_per_question,
        question_timer_seconds: settings.question_timer_seconds,
        speed_bonus_enabled: settings.speed_bonus_enabled,
        max_speed_bonus: settings.max_speed_bonus,
        streak_multiplier_enabled: settings.streak_multiplier_enabled,
        question_started_at: now,
        started_at: now,
        finished_at: None,
    };

    create_session(pool, &session).await?;

    info!("Session {} started for quiz {}", session.id, quiz.id);
    Ok((StatusCode::CREATED, Json(session)))
}

async fn join(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    ValidatedJson(request): ValidatedJson<JoinSessionRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let pool = state.get_pool();
    let code = request.code.trim().to_uppercase();

    let quiz = get_quiz_by_code(pool, &code)
        .await?
        .ok_or_else(|| ServerError::NotFound("No quiz found for this code".into()))?;

    let session = get_active_session_by_quiz(pool, quiz.id)
        .await?
        .ok_or_else(|| ServerError::NotFound("No live session for this quiz".into()))?;

    let participant = Participant {
        id: Uuid::new_v4(),
        session_id: session.id,
        subject_id: subject_id.uuid(),
        nickname: request.nickname.trim().to_string(),
        score: 0,
        streak: 0,
        longest_streak: 0,
        correct_count: 0,
        answered_count: 0,
        status: ParticipantStatus::Active,
        joined_at: Utc::now(),
    };

    let inserted = create_participant(pool, &participant).await?;
    if !inserted {
        // Rejoin after a dropped connection: hand back the existing row
        // with its score intact.
        let existing = get_by_session_and_subject(pool, session.id, subject_id.uuid())
            .await?
            .ok_or_else(|| ServerError::Internal("Participant row vanished mid-join".into()))?;

        warn!("Subject rejoined session {}", session.id);
        return Ok((
            StatusCode::OK,
            Json(serde_json::json!({
                "session": session,
                "participant": existing,
            })),
        ));
    }

    state.get_notifier().publish(ChangeEvent::ParticipantJoined {
        session_id: session.id,
        participant_id: participant.id,
        nickname: participant.nickname.clone(),
    });

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session": session,
            "participant": participant,
        })),
    ))
}

/// Host-side view of the active question, correct index included.
async fn current_question(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let pool = state.get_pool();
    let session = get_session(pool, session_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Session {} does not exist", session_id)))?;

    if session.host_id != subject_id.uuid() {
        return Err(ServerError::AccessDenied);
    }

    let questions = cached_questions(&state, &session).await?;
    let question = questions
        .get(session.current_index as usize)
        .ok_or_else(|| ServerError::Internal("Current index points past question list".into()))?;

    let response = CurrentQuestionResponse {
        index: session.current_index,
        total: session.total_questions,
        question: question.to_view(),
        session,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Student-side view: no correct index, plus whether the caller already
/// answered the active question.
async fn student_question(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let pool = state.get_pool();
    let session = get_session(pool, session_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Session {} does not exist", session_id)))?;

    let participant = get_by_session_and_subject(pool, session_id, subject_id.uuid())
        .await?
        .ok_or_else(|| ServerError::NotFound("Participant not found in session".into()))?;

    let questions = cached_questions(&state, &session).await?;
    let question = questions
        .get(session.current_index as usize)
        .ok_or_else(|| ServerError::Internal("Current index points past question list".into()))?;

    let answer = get_answer(pool, participant.id, session.current_index).await?;

    let response = StudentQuestionResponse {
        question: question.to_student_view(),
        question_index: session.current_index,
        total_questions: session.total_questions,
        has_answered: answer.is_some(),
        answer,
        participant,
        session,
    };

    Ok((StatusCode::OK, Json(response)))
}

async fn advance(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let response = advance_question(&state, subject_id.uuid(), session_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

async fn end(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    end_session(&state, subject_id.uuid(), session_id).await?;
    Ok(StatusCode::OK)
}

async fn answer(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Path(session_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let response = submit_answer(&state, subject_id, session_id, request).await?;
    Ok((StatusCode::OK, Json(response)))
}

async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(_subject_id): Extension<SubjectId>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let pool = state.get_pool();

    if get_session(pool, session_id).await?.is_none() {
        return Err(ServerError::NotFound(format!(
            "Session {} does not exist",
            session_id
        )));
    }

    let rows = get_standings(pool, session_id).await?;
    let entries = assign_ranks(rows);

    Ok((StatusCode::OK, Json(entries)))
}

async fn answer_stats(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Path((session_id, question_index)): Path<(Uuid, i32)>,
) -> Result<impl IntoResponse, ServerError> {
    let pool = state.get_pool();
    let session = get_session(pool, session_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Session {} does not exist", session_id)))?;

    if session.host_id != subject_id.uuid() {
        return Err(ServerError::AccessDenied);
    }

    let rows = get_answer_rows(pool, session_id, question_index).await?;
    let stats = fold_answer_stats(&rows);

    Ok((StatusCode::OK, Json(stats)))
}

async fn cached_questions(
    state: &AppState,
    session: &QuizSession,
) -> Result<Vec<crate::models::quiz::QuizQuestion>, ServerError> {
    let pool = state.get_pool();
    let quiz_id = session.quiz_id;

    let questions = state
        .get_question_cache()
        .get_or(&session.id, async || get_questions(pool, quiz_id).await)
        .await?;

    Ok(questions)
}
