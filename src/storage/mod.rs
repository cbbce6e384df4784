pub mod rally_log;
pub mod repo;
