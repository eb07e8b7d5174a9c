pub mod code_vault;
pub mod leaderboard;
pub mod notifier;
pub mod paging;
pub mod scoring;
pub mod session_flow;
pub mod session_settings;
pub mod standings;
pub mod voting;
