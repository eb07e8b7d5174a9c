use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::Utc;
use reqwest::StatusCode;
use uuid::Uuid;

use tracing::{info, warn};

use crate::{
    api::validation::ValidatedJson,
    config::app_config::CONFIG,
    db::{
        quiz::{
            create_quiz, get_quiz, get_quiz_page, get_questions, publish_quiz, replace_questions,
        },
        session::get_active_session_by_quiz,
    },
    models::{
        app_state::AppState,
        auth::{Claims, Permission, SubjectId},
        error::ServerError,
        page::PagedResponse,
        quiz::{
            CreateQuestionRequest, CreateQuizRequest, PublishQuizResponse, Quiz, QuizPageQuery,
            QuizQuestion, QuizStatus,
        },
    },
    service::session_controller::ensure_no_active_session,
};

const MAX_PUBLISH_ATTEMPTS: usize = 5;

pub fn quiz_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(create))
        .route("/page", get(get_page))
        .route("/{quiz_id}", get(get_by_id))
        .route("/{quiz_id}/questions", put(edit_questions))
        .route("/{quiz_id}/publish", post(publish))
        .with_state(state.clone())
}

async fn create(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(request): ValidatedJson<CreateQuizRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(mentor_id) = subject_id else {
        return Err(ServerError::AccessDenied);
    };

    if let Some(missing) = claims.missing_permission([Permission::WriteQuiz]) {
        return Err(ServerError::Permission(missing));
    }

    let quiz_id = Uuid::new_v4();
    let questions = build_questions(quiz_id, &request.questions)?;

    let now = Utc::now();
    let quiz = Quiz {
        id: quiz_id,
        mentor_id,
        title: request.title.trim().to_string(),
        description: request.description,
        status: QuizStatus::Draft,
        join_code: None,
        created_at: now,
        updated_at: now,
    };

    create_quiz(state.get_pool(), &quiz, &questions).await?;

    info!("Mentor {} created quiz {}", mentor_id, quiz_id);
    Ok((StatusCode::CREATED, Json(quiz)))
}

async fn edit_questions(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateQuizRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(mentor_id) = subject_id else {
        return Err(ServerError::AccessDenied);
    };

    if let Some(missing) = claims.missing_permission([Permission::WriteQuiz]) {
        return Err(ServerError::Permission(missing));
    }

    let questions = build_questions(quiz_id, &request.questions)?;

    let running = get_active_session_by_quiz(state.get_pool(), quiz_id).await?;
    ensure_no_active_session(running.as_ref())?;

    let old_code = get_quiz(state.get_pool(), quiz_id)
        .await?
        .and_then(|quiz| quiz.join_code);

    let replaced = replace_questions(state.get_pool(), quiz_id, mentor_id, &questions).await?;
    if !replaced {
        return Err(ServerError::NotFound(format!(
            "Quiz {} does not exist",
            quiz_id
        )));
    }

    // Editing demotes a published quiz back to draft, its old code is free
    // for reuse.
    if let Some(code) = old_code {
        state.get_vault().release_code(&code);
    }

    Ok(StatusCode::OK)
}

async fn publish(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(mentor_id) = subject_id else {
        return Err(ServerError::AccessDenied);
    };

    if let Some(missing) = claims.missing_permission([Permission::WriteQuiz]) {
        return Err(ServerError::Permission(missing));
    }

    let pool = state.get_pool();
    let quiz = get_quiz(pool, quiz_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Quiz {} does not exist", quiz_id)))?;

    if quiz.mentor_id != mentor_id {
        return Err(ServerError::AccessDenied);
    }

    if get_questions(pool, quiz_id).await?.is_empty() {
        return Err(ServerError::Api(
            StatusCode::BAD_REQUEST,
            "Cannot publish a quiz without questions".into(),
        ));
    }

    // Republishing rotates the join code, so stale codes on old handouts
    // stop working.
    let vault = state.get_vault();

    for _ in 0..MAX_PUBLISH_ATTEMPTS {
        let code = vault.create_code()?;

        match publish_quiz(pool, quiz_id, mentor_id, &code).await {
            Ok(true) => {
                if let Some(old_code) = &quiz.join_code {
                    vault.release_code(old_code);
                }

                info!("Quiz {} published with a fresh join code", quiz_id);
                return Ok((
                    StatusCode::OK,
                    Json(PublishQuizResponse {
                        quiz_id,
                        join_code: code,
                    }),
                ));
            }
            Ok(false) => {
                vault.release_code(&code);
                return Err(ServerError::NotFound(format!(
                    "Quiz {} does not exist",
                    quiz_id
                )));
            }
            // The database unique constraint catches codes the vault lost
            // over a restart.
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                warn!("Join code collided with a persisted code, regenerating");
                vault.release_code(&code);
                continue;
            }
            Err(e) => {
                vault.release_code(&code);
                return Err(e.into());
            }
        }
    }

    Err(ServerError::Internal(
        "Failed to assign a unique join code".into(),
    ))
}

async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(mentor_id) = subject_id else {
        return Err(ServerError::AccessDenied);
    };

    let pool = state.get_pool();
    let quiz = get_quiz(pool, quiz_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Quiz {} does not exist", quiz_id)))?;

    if quiz.mentor_id != mentor_id {
        return Err(ServerError::AccessDenied);
    }

    let questions = get_questions(pool, quiz_id).await?;
    let views: Vec<_> = questions.iter().map(|q| q.to_view()).collect();

    Ok((StatusCode::OK, Json(serde_json::json!({
        "quiz": quiz,
        "questions": views,
    }))))
}

async fn get_page(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Query(query): Query<QuizPageQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(mentor_id) = subject_id else {
        return Err(ServerError::AccessDenied);
    };

    let page_num = query.page_num.unwrap_or(0);
    let rows = get_quiz_page(state.get_pool(), mentor_id, page_num).await?;
    let page = PagedResponse::from_overfetch(rows, page_num, CONFIG.server.page_size);

    Ok((StatusCode::OK, Json(page)))
}

fn build_questions(
    quiz_id: Uuid,
    requests: &[CreateQuestionRequest],
) -> Result<Vec<QuizQuestion>, ServerError> {
    requests
        .iter()
        .enumerate()
        .map(|(position, request)| {
            if request.correct_option_index < 0
                || request.correct_option_index as usize >= request.options.len()
            {
                return Err(ServerError::Api(
                    StatusCode::BAD_REQUEST,
                    format!(
                        "Correct option index out of range for question {}",
                        position
                    ),
                ));
            }

            Ok(QuizQuestion {
                id: Uuid::new_v4(),
                quiz_id,
                position: position as i32,
                prompt: request.prompt.clone(),
                options: sqlx::types::Json(request.options.clone()),
                correct_option_index: request.correct_option_index,
            })
        })
        .collect()
}
