//! Inventory Server
//!
//! REST JSON API for tracking equipment, serial-numbered equipment units,
//! the organizations they are delivered to, and an append-only history of
//! unit movements (entry, transport, maintenance, delivery).

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
