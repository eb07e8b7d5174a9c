use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct SystemLog {
    pub id: i64,
    pub subject_id: String,
    pub action: LogAction,
    pub severity: LogSeverity,
    pub origin: String,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "log_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    Critical,
    Warning,
    Info,
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogSeverity::Critical => write!(f, "critical"),
            LogSeverity::Warning => write!(f, "warning"),
            LogSeverity::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "log_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    Create,
    Read,
    Update,
    Delete,
    Other,
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogAction::Create => write!(f, "create"),
            LogAction::Read => write!(f, "read"),
            LogAction::Update => write!(f, "update"),
            LogAction::Delete => write!(f, "delete"),
            LogAction::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyslogPageQuery {
    pub page_num: Option<u16>,
    pub severity: Option<LogSeverity>,
}
