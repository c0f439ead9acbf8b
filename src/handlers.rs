pub mod auth;
pub mod dashboard;
pub mod periods;
pub mod permissions;
pub mod static_files;
pub mod users;
