pub mod cache;
pub mod code_vault;
pub mod notifier;
pub mod scoring;
pub mod session_controller;
pub mod standings;
pub mod submission;
pub mod system_log_builder;
pub mod util;
