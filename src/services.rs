pub mod admin_service;
pub mod auth;
pub mod dashboard_service;
pub mod period_store;
pub mod static_files;
pub mod user_directory;
