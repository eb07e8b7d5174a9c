pub mod answer;
pub mod discussion;
pub mod health;
pub mod leaderboard;
pub mod participant;
pub mod quiz;
pub mod session;
pub mod system_log;
pub mod task;
pub mod team;
pub mod user;
