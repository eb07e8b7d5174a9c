use std::{collections::HashSet, time::SystemTimeError};

use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;
use tracing::{error, warn};

use crate::{models::auth::Permission, service::code_vault::CodeVaultError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Sqlx failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Api error: {1}")]
    Api(StatusCode, String),

    #[error("Permission error")]
    Permission(HashSet<Permission>),

    #[error("Access denied error")]
    AccessDenied,

    #[error("Unauthenticated request")]
    Unauthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JWT verification error: {0}")]
    JwtVerification(String),

    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CodeVault error: {0}")]
    CodeVault(#[from] CodeVaultError),

    #[error("Failed to create system time: {0}")]
    TimeCreation(#[from] SystemTimeError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Sqlx(e) => {
                error!("Sqlx failed with error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, String::new())
            }
            ServerError::Internal(e) => {
                error!("Internal server error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, String::new())
            }
            ServerError::Api(sc, msg) => {
                error!("Api error: {} - {}", sc, msg);
                (sc, msg)
            }
            ServerError::Permission(missing) => {
                warn!("Missing permission: {:?}", missing);
                (
                    StatusCode::FORBIDDEN,
                    format!("Missing permission: {:?}", missing),
                )
            }
            ServerError::AccessDenied => {
                warn!("Access denied for requesting entity");
                (StatusCode::FORBIDDEN, String::from("Access denied"))
            }
            ServerError::Unauthenticated => {
                warn!("Request without a valid caller identity");
                (StatusCode::UNAUTHORIZED, String::new())
            }
            ServerError::NotFound(e) => {
                warn!("Entity not found: {}", e);
                (StatusCode::NOT_FOUND, e)
            }
            ServerError::Conflict(e) => {
                warn!("Conflicting write rejected: {}", e);
                (StatusCode::CONFLICT, e)
            }
            ServerError::Reqwest(e) => {
                error!("Failed to send request: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("Failed to access third party"),
                )
            }
            ServerError::JwtVerification(e) => {
                warn!("Failed to verify JWT: {}", e);
                (StatusCode::UNAUTHORIZED, String::new())
            }
            ServerError::Json(e) => {
                error!("Json error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, String::new())
            }
            ServerError::CodeVault(e) => {
                error!("CodeVault error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, String::new())
            }
            ServerError::TimeCreation(e) => {
                error!("Failed to create system time: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, String::new())
            }
        }
        .into_response()
    }
}
