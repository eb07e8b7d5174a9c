use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use reqwest::StatusCode;
use uuid::Uuid;

use tracing::{info, warn};

use crate::{
    api::validation::ValidatedJson,
    db::team::{
        create_team, get_team_by_code, get_team_for_user, insert_member_if_capacity, is_member,
    },
    models::{
        app_state::AppState,
        auth::SubjectId,
        error::ServerError,
        team::{CreateTeamRequest, JoinTeamRequest, Team},
    },
};

const MAX_CODE_ATTEMPTS: usize = 5;

pub fn team_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(create))
        .route("/join", post(join))
        .route("/mine", get(my_team))
        .with_state(state.clone())
}

async fn create(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    ValidatedJson(request): ValidatedJson<CreateTeamRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(user_id) = subject_id else {
        return Err(ServerError::AccessDenied);
    };

    let vault = state.get_vault();

    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = vault.create_code()?;

        let team = Team {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            code: code.clone(),
            capacity: request.capacity,
            created_by: user_id,
            created_at: Utc::now(),
        };

        match create_team(state.get_pool(), &team).await {
            Ok(()) => {
                info!("Team {} created by {}", team.id, user_id);
                return Ok((StatusCode::CREATED, Json(team)));
            }
            Err(ServerError::Sqlx(sqlx::Error::Database(e))) if e.is_unique_violation() => {
                warn!("Team code collided with a persisted code, regenerating");
                vault.release_code(&code);
                continue;
            }
            Err(e) => {
                vault.release_code(&code);
                return Err(e);
            }
        }
    }

    Err(ServerError::Internal(
        "Failed to assign a unique team code".into(),
    ))
}

async fn join(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Json(request): Json<JoinTeamRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(user_id) = subject_id else {
        return Err(ServerError::AccessDenied);
    };

    let pool = state.get_pool();
    let code = request.code.trim().to_uppercase();

    let team = get_team_by_code(pool, &code)
        .await?
        .ok_or_else(|| ServerError::NotFound("No team found for this code".into()))?;

    let joined = insert_member_if_capacity(pool, team.id, user_id).await?;
    if joined.is_none() {
        // Either the team is full or the user already belongs to one, the
        // membership table tells the two apart.
        if is_member(pool, user_id).await? {
            return Err(ServerError::Conflict("User already has a team".into()));
        }

        return Err(ServerError::Conflict("Team is full".into()));
    }

    Ok((StatusCode::OK, Json(team)))
}

async fn my_team(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
) -> Result<impl IntoResponse, ServerError> {
    let SubjectId::User(user_id) = subject_id else {
        return Err(ServerError::AccessDenied);
    };

    let team = get_team_for_user(state.get_pool(), user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User has no team".into()))?;

    Ok((StatusCode::OK, Json(team)))
}
