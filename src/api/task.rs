use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::Utc;
use reqwest::StatusCode;
use uuid::Uuid;

use crate::{
    api::validation::ValidatedJson,
    config::app_config::CONFIG,
    db::{
        task::{complete_task, create_task, get_tasks_for_mentor, get_tasks_for_student},
        user::get_user,
    },
    models::{
        app_state::AppState,
        auth::{Claims, Permission, SubjectId},
        error::ServerError,
        page::PagedResponse,
        task::{CreateTaskRequest, Task, TaskPageQuery, TaskStatus},
    },
};

pub fn task_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(create))
        .route("/assigned", get(get_assigned))
        .route("/created", get(get_created))
        .route("/{task_id}/complete", patch(complete))
        .with_state(state.clone())
}

async fn create(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(request): ValidatedJson<CreateTaskRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(mentor_id) = subject_id else {
        return Err(ServerError::AccessDenied);
    };

    if let Some(missing) = claims.missing_permission([Permission::WriteTask]) {
        return Err(ServerError::Permission(missing));
    }

    if get_user(state.get_pool(), request.student_id).await?.is_none() {
        return Err(ServerError::NotFound(format!(
            "Student {} does not exist",
            request.student_id
        )));
    }

    let task = Task {
        id: Uuid::new_v4(),
        mentor_id,
        student_id: request.student_id,
        title: request.title.trim().to_string(),
        description: request.description,
        status: TaskStatus::Open,
        created_at: Utc::now(),
        completed_at: None,
    };

    create_task(state.get_pool(), &task).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn complete(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Path(task_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let completed = complete_task(state.get_pool(), task_id, subject_id.uuid()).await?;
    if !completed {
        return Err(ServerError::Conflict(
            "Task is already done or not assigned to the caller".into(),
        ));
    }

    Ok(StatusCode::OK)
}

async fn get_assigned(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Query(query): Query<TaskPageQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let page_num = query.page_num.unwrap_or(0);
    let rows = get_tasks_for_student(state.get_pool(), subject_id.uuid(), page_num).await?;
    let page = PagedResponse::from_overfetch(rows, page_num, CONFIG.server.page_size);

    Ok((StatusCode::OK, Json(page)))
}

async fn get_created(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Query(query): Query<TaskPageQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(mentor_id) = subject_id else {
        return Err(ServerError::AccessDenied);
    };

    let page_num = query.page_num.unwrap_or(0);
    let rows = get_tasks_for_mentor(state.get_pool(), mentor_id, page_num).await?;
    let page = PagedResponse::from_overfetch(rows, page_num, CONFIG.server.page_size);

    Ok((StatusCode::OK, Json(page)))
}
