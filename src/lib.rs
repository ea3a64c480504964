//! Catalog API Library
//!
//! Taxonomy-driven catalog core for a multi-brand storefront: slug-path
//! browsing, unified search, color-variation grouping, and product image
//! galleries.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod slug;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub use config::AppConfig;
pub use errors::{ApiError, ServiceError};
pub use handlers::AppServices;

/// Shared application state, cloned into every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: AppConfig,
    pub event_sender: Arc<events::EventSender>,
    pub services: AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: AppConfig,
        event_sender: Arc<events::EventSender>,
    ) -> Self {
        let services = AppServices::new(db.clone(), event_sender.clone());
        Self {
            db,
            config,
            event_sender,
            services,
        }
    }
}

/// The complete application router: health, the `/api/v1` surface, and
/// swagger-ui at `/docs`.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", handlers::api_router())
        .merge(openapi::swagger_ui())
        .with_state(state)
}
