pub mod config;
pub mod milestones;
pub mod status;
pub mod watch;
