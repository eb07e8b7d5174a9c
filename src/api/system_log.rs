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
    db,
    models::{
        app_state::AppState,
        auth::{Claims, Permission, SubjectId},
        error::ServerError,
        page::PagedResponse,
        system_log::SyslogPageQuery,
    },
};

pub fn log_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(get_system_log_page))
        .with_state(state)
}

async fn get_system_log_page(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<SyslogPageQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(_) = subject_id else {
        tracing::error!("Unauthorized subject attempted to read system logs");
        return Err(ServerError::AccessDenied);
    };

    if let Some(missing) = claims.missing_permission([Permission::ReadAdmin]) {
        return Err(ServerError::Permission(missing));
    }

    let page_num = query.page_num.unwrap_or(0);
    let rows = db::system_log::get_syslog_page(state.get_pool(), page_num, &query.severity).await?;
    let page = PagedResponse::from_overfetch(rows, page_num, CONFIG.server.page_size);

    Ok((StatusCode::OK, Json(page)))
}
