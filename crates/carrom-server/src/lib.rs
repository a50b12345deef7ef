pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod score_store;
pub mod state;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use carrom_core::config::CarromConfig;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig, game: CarromConfig) -> (Router<()>, AppState) {
    let web_root = config.web_root.clone();
    let body_limit = config.max_body_bytes;
    let state = AppState::new(config, game);

    let api_routes = Router::new()
        .route("/ai-shot", post(api::ai_shot))
        .route("/scores", get(api::get_scores).post(api::post_score));

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api/v1", api_routes)
        .fallback_service(ServeDir::new(&web_root))
        .layer(DefaultBodyLimit::max(body_limit))
        // Browser clients may be served from elsewhere.
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    (app, state)
}
