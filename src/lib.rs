//! Crate entrypoint wiring together configuration, the catalog repository, and the API.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

use config::AppConfig;
use db::DatabaseRepo;

use std::sync::Arc;

/// Complete application dependencies shared across handlers.
pub struct AppState {
    pub config: AppConfig,
    pub repo: Arc<dyn DatabaseRepo>,
}

/// Arc-wrapped version of `AppState` passed into Axum extensions.
pub type SharedState = Arc<AppState>;
