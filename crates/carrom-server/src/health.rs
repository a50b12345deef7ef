use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Structured health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub leaderboard: LeaderboardInfo,
}

#[derive(Serialize)]
pub struct LeaderboardInfo {
    pub entries: usize,
    pub capacity: usize,
    pub persistent: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let leaderboard = {
        let store = state.scores.read().await;
        LeaderboardInfo {
            entries: store.entries().len(),
            capacity: store.capacity(),
            persistent: store.is_persistent(),
        }
    };
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        leaderboard,
    })
}

/// GET /ready: the planner needs a usable board config.
pub async fn readiness_check(State(state): State<AppState>) -> &'static str {
    if !state.game.validate().is_empty() {
        return "not ready: invalid game config";
    }
    "ready"
}
