use std::sync::Arc;

use axum::{
    Extension, Json, Router, extract::State, response::IntoResponse, routing::get,
};
use reqwest::StatusCode;

use crate::{
    db::{leaderboard::get_aggregate, user::get_user},
    models::{
        app_state::AppState, auth::SubjectId, error::ServerError, user::ProfileResponse,
    },
};

pub fn user_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/me", get(get_profile))
        .with_state(state.clone())
}

/// Profile and cross-session point totals for the caller. Works for guests
/// too once their lazily created row lands.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
) -> Result<impl IntoResponse, ServerError> {
    let pool = state.get_pool();

    let user = get_user(pool, subject_id.uuid())
        .await?
        .ok_or_else(|| ServerError::NotFound("User does not exist".into()))?;

    let stats = get_aggregate(pool, user.id).await?;

    Ok((StatusCode::OK, Json(ProfileResponse { user, stats })))
}
