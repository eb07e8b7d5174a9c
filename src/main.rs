use axum::{Router, middleware::from_fn_with_state};
use dotenvy::dotenv;
use models::app_state::AppState;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api::{
        auth_mw::auth_mw, discussion::discussion_routes, events::event_routes,
        health::health_routes, leaderboard::leaderboard_routes, quiz::quiz_routes,
        session::session_routes, system_log::log_routes, task::task_routes, team::team_routes,
        user::user_routes,
    },
    config::app_config::CONFIG,
};

mod api;
mod config;
mod db;
mod models;
mod service;
mod tests;

#[tokio::main]
async fn main() {
    // Initialize .env
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Initialize state
    let state = AppState::from_connection_string(&CONFIG.database_url)
        .await
        .unwrap_or_else(|e| panic!("{}", e));

    // Spawn cron jobs
    state.spawn_session_cleanup();

    // Run migrations
    if let Err(e) = sqlx::migrate!().run(state.get_pool()).await {
        error!("Failed to run migrations: {}", e);
        return;
    }

    // Reload join codes that survived a restart
    if let Err(e) = state.adopt_persisted_codes().await {
        error!("Failed to adopt persisted join codes: {}", e);
        return;
    }

    let public_routes = Router::new().nest("/health", health_routes(state.clone()));

    let protected_routes = Router::new()
        .nest("/quizzes", quiz_routes(state.clone()))
        .nest("/sessions", session_routes(state.clone()))
        .nest("/events", event_routes(state.clone()))
        .nest("/leaderboard", leaderboard_routes(state.clone()))
        .nest("/discussions", discussion_routes(state.clone()))
        .nest("/teams", team_routes(state.clone()))
        .nest("/tasks", task_routes(state.clone()))
        .nest("/users", user_routes(state.clone()))
        .nest("/logs", log_routes(state.clone()))
        .layer(from_fn_with_state(state.clone(), auth_mw));

    let app = Router::new().merge(protected_routes).merge(public_routes);

    // Initialize webserver
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", CONFIG.server.address, CONFIG.server.port))
            .await
            .unwrap();

    info!(
        "Server listening on address: {}",
        listener.local_addr().unwrap()
    );
    axum::serve(listener, app).await.unwrap();
}
