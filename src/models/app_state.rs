use std::{sync::Arc, time::Duration};

use reqwest::Client;
use serde_json::json;
use sqlx::{Pool, Postgres};

use crate::{
    config::app_config::CONFIG,
    db::{
        quiz::get_published_join_codes, session::delete_stale_finished_sessions,
        team::get_team_codes,
    },
    models::{
        auth::Jwks,
        error::ServerError,
        quiz::QuizQuestion,
        system_log::{LogAction, LogSeverity},
    },
    service::{
        cache::TtlCache, code_vault::CodeVault, notifier::ChangeNotifier,
        system_log_builder::SystemLogBuilder,
    },
};

#[derive(Clone)]
pub struct AppState {
    pool: Pool<Postgres>,
    jwks: Jwks,
    code_vault: Arc<CodeVault>,
    notifier: Arc<ChangeNotifier>,
    question_cache: Arc<TtlCache<Vec<QuizQuestion>>>,
}

impl AppState {
    pub async fn from_connection_string(connection_string: &str) -> Result<Arc<Self>, ServerError> {
        let pool = Pool::<Postgres>::connect(connection_string).await?;
        let client = Client::new();

        let jwks_url = format!("{}.well-known/jwks.json", CONFIG.auth0.domain);
        let response = client.get(jwks_url).send().await?;
        let jwks = response.json::<Jwks>().await?;

        let code_vault = Arc::new(CodeVault::new(CONFIG.quiz.code_length));
        let notifier = Arc::new(ChangeNotifier::new());
        // Question lists are immutable once a session starts, a short ttl
        // only bounds memory for abandoned sessions.
        let question_cache = Arc::new(TtlCache::from_ttl(600));

        let state = Arc::new(Self {
            pool,
            jwks,
            code_vault,
            notifier,
            question_cache,
        });

        Ok(state)
    }

    pub fn get_pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    pub fn get_jwks(&self) -> &Jwks {
        &self.jwks
    }

    pub fn get_vault(&self) -> &CodeVault {
        &self.code_vault
    }

    pub fn get_notifier(&self) -> &Arc<ChangeNotifier> {
        &self.notifier
    }

    pub fn get_question_cache(&self) -> &Arc<TtlCache<Vec<QuizQuestion>>> {
        &self.question_cache
    }

    pub fn syslog(&self) -> SystemLogBuilder {
        SystemLogBuilder::new(self.get_pool())
    }

    /// Re-registers codes that survived a restart in the database, so fresh
    /// generation routes around them. Runs after migrations.
    pub async fn adopt_persisted_codes(&self) -> Result<(), ServerError> {
        let pool = self.get_pool();

        for code in get_published_join_codes(pool).await? {
            self.code_vault.adopt_code(&code)?;
        }

        for code in get_team_codes(pool).await? {
            self.code_vault.adopt_code(&code)?;
        }

        Ok(())
    }

    pub fn spawn_session_cleanup(&self) {
        let pool = self.get_pool().clone();
        let notifier = self.notifier.clone();
        let mut interval = tokio::time::interval(Duration::from_secs(3_600));

        tokio::spawn(async move {
            loop {
                interval.tick().await;
                match delete_stale_finished_sessions(&pool).await {
                    Ok(purged) => {
                        for session_id in purged {
                            notifier.drop_topic(session_id);
                        }
                    }
                    Err(e) => {
                        SystemLogBuilder::new(&pool)
                            .action(LogAction::Delete)
                            .severity(LogSeverity::Warning)
                            .origin("spawn_session_cleanup")
                            .description("Failed to purge stale finished sessions")
                            .metadata(json!({"error": e.to_string()}))
                            .log_async();
                    }
                }
            }
        });
    }
}
