pub mod app_state;
pub mod auth;
pub mod discussion;
pub mod error;
pub mod event;
pub mod leaderboard;
pub mod page;
pub mod quiz;
pub mod session;
pub mod system_log;
pub mod task;
pub mod team;
pub mod user;
