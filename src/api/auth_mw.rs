use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation, decode, decode_header};
use sqlx::{Pool, Postgres};

use crate::{
    config::app_config::CONFIG,
    db::user::{ensure_base_user, ensure_guest_user},
    models::{
        app_state::AppState,
        auth::{Claims, Jwks, SubjectId},
        error::ServerError,
    },
    service::util::{extract_header, to_uuid},
};

static GUEST_AUTHORIZATION: &str = "X-Guest-Authentication";

/// Resolves the caller identity for every protected route. Registered users
/// authenticate with a bearer token; students joining a live session may
/// instead present a client-issued guest uuid.
pub async fn auth_mw(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ServerError> {
    let guest_header = extract_header(GUEST_AUTHORIZATION, req.headers());
    let token_header = extract_header(AUTHORIZATION.as_str(), req.headers());

    match (guest_header, token_header) {
        (Some(guest_header), ..) => {
            handle_guest(state.get_pool(), &mut req, &guest_header).await?;
        }
        (None, Some(token_header)) => {
            handle_token_header(state.clone(), &mut req, &token_header).await?;
        }
        _ => {
            tracing::warn!("Request without any authentication header");
            return Err(ServerError::Unauthenticated);
        }
    };

    Ok(next.run(req).await)
}

async fn handle_guest(
    pool: &Pool<Postgres>,
    request: &mut Request<Body>,
    guest_header: &str,
) -> Result<(), ServerError> {
    let guest_id = to_uuid(guest_header)?;

    let pool_clone = pool.clone();
    tokio::task::spawn(async move { ensure_guest_user(&pool_clone, guest_id).await });

    request.extensions_mut().insert(SubjectId::Guest(guest_id));
    request.extensions_mut().insert(Claims::empty());

    Ok(())
}

async fn handle_token_header(
    state: Arc<AppState>,
    request: &mut Request<Body>,
    token_header: &str,
) -> Result<(), ServerError> {
    let Some(token) = token_header.strip_prefix("Bearer ") else {
        return Err(ServerError::Api(
            StatusCode::UNAUTHORIZED,
            "Missing auth token".into(),
        ));
    };

    let token_data = verify_jwt(token, state.get_jwks()).await?;
    let claims: Claims = serde_json::from_value(token_data.claims)?;

    let user = ensure_base_user(state.get_pool(), claims.auth0_id()).await?;

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(SubjectId::User(user.id));

    Ok(())
}

async fn verify_jwt(token: &str, jwks: &Jwks) -> Result<TokenData<serde_json::Value>, ServerError> {
    let header = decode_header(token)
        .map_err(|e| ServerError::JwtVerification(format!("Failed to decode header: {}", e)))?;

    let kid = header
        .kid
        .ok_or_else(|| ServerError::JwtVerification("Missing JWT kid".into()))?;

    let jwk = jwks
        .keys
        .iter()
        .find(|jwk| jwk.kid == kid)
        .ok_or_else(|| ServerError::JwtVerification("JWK is not well known".into()))?;

    let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
        .map_err(|e| ServerError::JwtVerification(format!("Failed to get decoding key: {}", e)))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[&CONFIG.auth0.audience]);
    validation.set_issuer(&[&CONFIG.auth0.domain]);

    decode::<serde_json::Value>(token, &decoding_key, &validation)
        .map_err(|e| ServerError::JwtVerification(format!("Failed to validate token: {}", e)))
}
