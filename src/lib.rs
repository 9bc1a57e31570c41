//! Libris Book Library Management Server
//!
//! A Rust backend for managing a digital library, providing a REST JSON API
//! for authors, books, borrowers, and the borrow/return workflow.

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
