use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use reqwest::StatusCode;

use crate::{
    config::app_config::CONFIG,
    db::leaderboard::get_global_page,
    models::{
        app_state::AppState, auth::SubjectId, error::ServerError,
        leaderboard::LeaderboardPageQuery, page::PagedResponse,
    },
};

pub fn leaderboard_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/page", get(get_page))
        .with_state(state.clone())
}

/// Global standings across all sessions, ordered by total points.
async fn get_page(
    State(state): State<Arc<AppState>>,
    Extension(_subject_id): Extension<SubjectId>,
    Query(query): Query<LeaderboardPageQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let page_num = query.page_num.unwrap_or(0);
    let rows = get_global_page(state.get_pool(), page_num).await?;
    let page = PagedResponse::from_overfetch(rows, page_num, CONFIG.server.page_size);

    Ok((StatusCode::OK, Json(page)))
}
