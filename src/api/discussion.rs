use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use reqwest::StatusCode;
use uuid::Uuid;

use crate::{
    api::validation::ValidatedJson,
    config::app_config::CONFIG,
    db::discussion::{
        cast_vote, create_discussion, get_discussion, get_discussion_page, get_score,
    },
    models::{
        app_state::AppState,
        auth::SubjectId,
        discussion::{
            CreateDiscussionRequest, Discussion, DiscussionPageQuery, VoteRequest, VoteResponse,
        },
        error::ServerError,
        page::PagedResponse,
    },
};

pub fn discussion_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(create))
        .route("/page", get(get_page))
        .route("/{discussion_id}/vote", post(vote))
        .with_state(state.clone())
}

async fn create(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    ValidatedJson(request): ValidatedJson<CreateDiscussionRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(author_id) = subject_id else {
        return Err(ServerError::AccessDenied);
    };

    let discussion = Discussion {
        id: Uuid::new_v4(),
        author_id,
        title: request.title.trim().to_string(),
        body: request.body,
        created_at: Utc::now(),
    };

    create_discussion(state.get_pool(), &discussion).await?;
    Ok((StatusCode::CREATED, Json(discussion)))
}

async fn get_page(
    State(state): State<Arc<AppState>>,
    Extension(_subject_id): Extension<SubjectId>,
    Query(query): Query<DiscussionPageQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let page_num = query.page_num.unwrap_or(0);
    let rows = get_discussion_page(state.get_pool(), page_num).await?;
    let page = PagedResponse::from_overfetch(rows, page_num, CONFIG.server.page_size);

    Ok((StatusCode::OK, Json(page)))
}

async fn vote(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Path(discussion_id): Path<Uuid>,
    Json(request): Json<VoteRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let pool = state.get_pool();

    if get_discussion(pool, discussion_id).await?.is_none() {
        return Err(ServerError::NotFound(format!(
            "Discussion {} does not exist",
            discussion_id
        )));
    }

    let outcome = cast_vote(pool, discussion_id, subject_id.uuid(), request.direction).await?;
    let score = get_score(pool, discussion_id).await?;

    Ok((StatusCode::OK, Json(VoteResponse { outcome, score })))
}
