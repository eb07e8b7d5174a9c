use axum::{Json, extract::FromRequest};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use validator::{Validate, ValidationError};

use crate::models::error::ServerError;

#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send + 'static,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ServerError::Api(StatusCode::BAD_REQUEST, "Invalid JSON".to_string()))?;

        let value = if content_type.starts_with("application/json") {
            match Json::<T>::from_request(req, state).await {
                Ok(Json(val)) => val,
                Err(_) => {
                    return Err(ServerError::Api(
                        StatusCode::BAD_REQUEST,
                        "Invalid JSON".into(),
                    ));
                }
            }
        } else {
            return Err(ServerError::Api(
                StatusCode::BAD_REQUEST,
                "Expected JSON".to_string(),
            ));
        };

        match value.validate() {
            Ok(_) => {
                debug!("Validation passed");
                Ok(ValidatedJson(value))
            }
            Err(e) => {
                let error_msg = format_validation_errors(&e);
                info!("Validation error: {}", error_msg);
                Err(ServerError::Api(StatusCode::BAD_REQUEST, error_msg))
            }
        }
    }
}

/// Format validation errors into a user-friendly message
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let msg = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} validation failed", field));
            messages.push(msg);
        }
    }

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join(", ")
    }
}

// Validation functions for reuse across models

/// Validate nickname: 2-30 chars, at least one alphanumeric
pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    let trimmed = nickname.trim();
    let len = trimmed.len();

    if len < 2 {
        return Err(ValidationError::new("nickname_too_short")
            .with_message("Nickname must be at least 2 characters".into()));
    }

    if len > 30 {
        return Err(ValidationError::new("nickname_too_long")
            .with_message("Nickname must be at most 30 characters".into()));
    }

    if !trimmed.chars().any(|c| c.is_alphanumeric()) {
        return Err(ValidationError::new("nickname_invalid")
            .with_message("Nickname must contain at least one letter or number".into()));
    }

    Ok(())
}

/// Validate titles (quiz, discussion, task): 3-100 chars, not just whitespace
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    let len = trimmed.len();

    if len < 3 {
        return Err(ValidationError::new("title_too_short")
            .with_message("Title must be at least 3 characters".into()));
    }

    if len > 100 {
        return Err(ValidationError::new("title_too_long")
            .with_message("Title must be at most 100 characters".into()));
    }

    if !trimmed.chars().any(|c| c.is_alphanumeric()) {
        return Err(ValidationError::new("title_invalid")
            .with_message("Title must contain at least one letter or number".into()));
    }

    Ok(())
}

/// Validate team name: 3-50 chars
pub fn validate_team_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().len();

    if len < 3 {
        return Err(ValidationError::new("team_name_too_short")
            .with_message("Team name must be at least 3 characters".into()));
    }

    if len > 50 {
        return Err(ValidationError::new("team_name_too_long")
            .with_message("Team name must be at most 50 characters".into()));
    }

    Ok(())
}

/// Validate a question's option list: 2-4 non-empty options
pub fn validate_options(options: &[String]) -> Result<(), ValidationError> {
    if options.len() < 2 || options.len() > 4 {
        return Err(ValidationError::new("options_count")
            .with_message("A question needs between 2 and 4 options".into()));
    }

    if options.iter().any(|option| option.trim().is_empty()) {
        return Err(ValidationError::new("option_empty")
            .with_message("Options cannot be empty".into()));
    }

    Ok(())
}
