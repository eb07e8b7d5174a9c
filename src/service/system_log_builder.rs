use sqlx::{Pool, Postgres};

use tracing::error;

use crate::{
    db::system_log::create_system_log,
    models::{
        auth::SubjectId,
        error::ServerError,
        system_log::{LogAction, LogSeverity},
    },
};

/// Builder for persisted audit log entries. Operational rather than
/// user-facing; critical paths log here in addition to tracing.
pub struct SystemLogBuilder {
    pool: Pool<Postgres>,
    subject_id: Option<String>,
    action: Option<LogAction>,
    severity: Option<LogSeverity>,
    origin: Option<String>,
    description: Option<String>,
    metadata: Option<serde_json::Value>,
}

impl SystemLogBuilder {
    pub fn new(pool: &Pool<Postgres>) -> Self {
        Self {
            pool: pool.clone(),
            subject_id: None,
            action: None,
            severity: None,
            origin: None,
            description: None,
            metadata: None,
        }
    }

    pub fn subject(mut self, subject: SubjectId) -> Self {
        self.subject_id = Some(subject.uuid().to_string());
        self
    }

    pub fn action(mut self, action: LogAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn severity(mut self, severity: LogSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub async fn log(self) -> Result<(), ServerError> {
        let subject_id = self.subject_id.unwrap_or_else(|| "[SYSTEM]".to_string());

        let mut description = self
            .description
            .unwrap_or_else(|| "No description".to_string());

        // Ensure description fits VARCHAR(512) constraint
        if description.len() > 512 {
            description = format!("{}...", &description[..509]);
        }

        let action = self.action.unwrap_or(LogAction::Other);
        let severity = self.severity.unwrap_or(LogSeverity::Info);
        let origin = self.origin.unwrap_or_else(|| "Not specified".into());

        create_system_log(
            &self.pool,
            &subject_id,
            &action,
            &severity,
            &origin,
            &description,
            &self.metadata,
        )
        .await?;
        Ok(())
    }

    pub fn log_async(self) {
        tokio::spawn(async move {
            self.log().await.map_err(|e| {
                error!("Failed to system log async: {}", e);
            })
        });
    }
}
