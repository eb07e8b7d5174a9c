use core::fmt;
use std::env;

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub static CONFIG: Lazy<AppConfig> =
    Lazy::new(|| AppConfig::load().unwrap_or_else(|e| panic!("{}", e)));

#[derive(Serialize, Deserialize, Debug)]
pub enum Runtime {
    Dev,
    Prod,
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Runtime::Dev => write!(f, "development"),
            Runtime::Prod => write!(f, "production"),
        }
    }
}

impl From<String> for Runtime {
    fn from(value: String) -> Self {
        match value.as_str() {
            "DEVELOPMENT" => Runtime::Dev,
            "PRODUCTION" => Runtime::Prod,
            _ => Runtime::Prod,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth0: Auth0Config,
    pub quiz: QuizConfig,
    pub database_url: String,
}

fn default_address() -> String {
    "127.0.0.1".into()
}

fn default_port() -> String {
    "3000".into()
}

fn default_page_size() -> u16 {
    20
}

fn default_runtime() -> Runtime {
    Runtime::Dev
}

fn default_finished_session_retention() -> u8 {
    24
}

fn default_points_per_question() -> i32 {
    1000
}

fn default_question_timer_seconds() -> i32 {
    20
}

fn default_max_speed_bonus() -> i32 {
    500
}

fn default_deadline_grace_ms() -> i64 {
    2_000
}

fn default_code_length() -> usize {
    6
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default = "default_page_size")]
    pub page_size: u16,
    /// Hours a finished session is kept before the cleanup job purges it.
    #[serde(default = "default_finished_session_retention")]
    pub finished_session_retention: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Auth0Config {
    pub domain: String,
    pub audience: String,
    #[serde(default = "default_runtime")]
    pub runtime: Runtime,
}

/// Fallback session settings, used when a mentor starts a session
/// without overriding them.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default = "default_points_per_question")]
    pub points_per_question: i32,
    #[serde(default = "default_question_timer_seconds")]
    pub question_timer_seconds: i32,
    #[serde(default = "default_max_speed_bonus")]
    pub max_speed_bonus: i32,
    /// Tolerance added to the question timer before the server rejects
    /// a late submission.
    #[serde(default = "default_deadline_grace_ms")]
    pub deadline_grace_ms: i64,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
}

impl AppConfig {
    fn load() -> Result<Self, ConfigError> {
        let runtime: Runtime = env::var("ENVIRONMENT").expect("ENVIRONMENT not set").into();

        let config: AppConfig = Config::builder()
            .add_source(File::with_name(&format!("src/config/{}.toml", runtime)))
            .add_source(Environment::with_prefix("MENTORA").separator("__"))
            .build()?
            .try_deserialize()?;

        debug!(
            "Loaded config: {}",
            serde_json::to_string_pretty(&config).unwrap()
        );

        Ok(config)
    }
}
