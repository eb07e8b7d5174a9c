use sqlx::{Pool, Postgres};

use crate::{
    config::app_config::CONFIG,
    models::{
        page::page_bounds,
        system_log::{LogAction, LogSeverity, SystemLog},
    },
};

#[allow(clippy::too_many_arguments)]
pub async fn create_system_log(
    pool: &Pool<Postgres>,
    subject_id: &str,
    action: &LogAction,
    severity: &LogSeverity,
    origin: &str,
    description: &str,
    metadata: &Option<serde_json::Value>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO "system_log" (subject_id, action, severity, origin, description, metadata, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, now())
        "#,
    )
    .bind(subject_id)
    .bind(action)
    .bind(severity)
    .bind(origin)
    .bind(description)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_syslog_page(
    pool: &Pool<Postgres>,
    page_num: u16,
    severity: &Option<LogSeverity>,
) -> Result<Vec<SystemLog>, sqlx::Error> {
    let (limit, offset) = page_bounds(CONFIG.server.page_size, page_num);

    let severity_condition = match severity {
        Some(severity) => format!("WHERE severity = '{}'", severity),
        None => String::new(),
    };

    sqlx::query_as::<_, SystemLog>(&format!(
        r#"
        SELECT id, subject_id, action, severity, origin, description, metadata, created_at
        FROM "system_log"
        {}
        ORDER BY created_at DESC
        LIMIT {} OFFSET {}
        "#,
        severity_condition, limit, offset
    ))
    .fetch_all(pool)
    .await
}
