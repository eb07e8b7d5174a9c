pub mod auth_mw;
pub mod discussion;
pub mod events;
pub mod health;
pub mod leaderboard;
pub mod quiz;
pub mod session;
pub mod system_log;
pub mod task;
pub mod team;
pub mod user;
pub mod validation;
