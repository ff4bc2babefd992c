//! Read-only HTTP API endpoints.
//!
//! Used by setup screens to render the level picker before a socket is open.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;
use crate::types::{Category, DifficultyLevel, DIFFICULTY_LEVELS};

/// A difficulty level with how much content exists for it
#[derive(Debug, Clone, Serialize)]
pub struct LevelInfo {
    #[serde(flatten)]
    pub level: DifficultyLevel,
    pub truths: usize,
    pub dares: usize,
}

/// List the difficulty catalog.
///
/// GET /api/levels
pub async fn list_levels(State(state): State<Arc<AppState>>) -> Json<Vec<LevelInfo>> {
    let levels = DIFFICULTY_LEVELS
        .iter()
        .map(|level| LevelInfo {
            level: *level,
            truths: state.bank.count(Category::Truth, level.level),
            dares: state.bank.count(Category::Dare, level.level),
        })
        .collect();

    Json(levels)
}

/// Current session snapshot.
///
/// GET /api/state
pub async fn session_state(State(state): State<Arc<AppState>>) -> Response {
    match state.snapshot().await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            tracing::error!("Failed to read session state: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    }
}
