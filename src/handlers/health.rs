use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub version: String,
    pub database: ComponentStatus,
    pub timestamp: String,
}

/// Liveness probe; pings the database with a trivial query.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service health"))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_ok = state
        .db
        .execute(Statement::from_string(
            state.db.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();

    let database = if db_ok {
        ComponentStatus::Up
    } else {
        ComponentStatus::Down
    };
    Json(HealthResponse {
        status: if db_ok {
            ComponentStatus::Up
        } else {
            ComponentStatus::Down
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
