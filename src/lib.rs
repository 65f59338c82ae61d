//! taskr - a small task list web app
//!
//! User registration, session-based login/logout and a task form, served
//! with axum over a SQLite database.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod ui;

pub use api::{create_router, AppState, SharedState};
pub use config::Config;
pub use db::Database;
pub use error::Error;
