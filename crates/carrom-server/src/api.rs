use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use serde::Deserialize;

use carrom_core::protocol::{AiShotRequest, AiShotResponse, DiscState};
use carrom_game::planner;

use crate::error::AppError;
use crate::score_store::{ScoreEntry, write_file};
use crate::state::AppState;

fn disc_is_finite(d: &DiscState) -> bool {
    [d.x, d.y, d.vx, d.vy, d.radius, d.mass]
        .iter()
        .all(|v| v.is_finite())
}

fn validate_ai_request(req: &AiShotRequest, max_coins: usize) -> Result<(), AppError> {
    if req.coins.len() > max_coins {
        return Err(AppError::BadRequest(format!(
            "too many coins: {} (max {max_coins})",
            req.coins.len()
        )));
    }
    if !disc_is_finite(&req.striker) {
        return Err(AppError::BadRequest("striker has non-finite fields".to_string()));
    }
    if let Some(i) = req.coins.iter().position(|c| !disc_is_finite(c)) {
        return Err(AppError::BadRequest(format!(
            "coin {i} has non-finite fields"
        )));
    }
    Ok(())
}

/// POST /api/v1/ai-shot: choose a striker velocity for the posted board.
pub async fn ai_shot(
    State(state): State<AppState>,
    Json(req): Json<AiShotRequest>,
) -> Result<Json<AiShotResponse>, AppError> {
    validate_ai_request(&req, state.config.ai.max_coins)?;

    let seed: u64 = state.rng.lock().await.random();
    let game = Arc::clone(&state.game);
    let difficulty = req.difficulty;
    let velocity = tokio::task::spawn_blocking(move || {
        let mut rng = StdRng::seed_from_u64(seed);
        planner::plan_shot(&req, &game, &mut rng)
    })
    .await
    .map_err(|e| AppError::Internal(format!("planner task failed: {e}")))?;

    tracing::debug!(
        difficulty = difficulty.as_str(),
        vx = velocity.x,
        vy = velocity.y,
        "AI shot planned"
    );
    Ok(Json(AiShotResponse::from(velocity)))
}

/// Body of `POST /api/v1/scores`.
#[derive(Debug, Deserialize)]
pub struct PostScoreBody {
    #[serde(default)]
    pub name: Option<String>,
    pub score: u32,
    #[serde(default)]
    pub shots: u32,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub time_secs: f64,
}

fn clean_text(raw: Option<&str>, fallback: &str, max_chars: usize) -> String {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    trimmed.chars().take(max_chars).collect()
}

/// GET /api/v1/scores: the leaderboard, highest first.
pub async fn get_scores(State(state): State<AppState>) -> Json<Vec<ScoreEntry>> {
    let store = state.scores.read().await;
    Json(store.entries().to_vec())
}

/// POST /api/v1/scores: record a finished game and return the leaderboard.
pub async fn post_score(
    State(state): State<AppState>,
    Json(body): Json<PostScoreBody>,
) -> Result<(StatusCode, Json<Vec<ScoreEntry>>), AppError> {
    if !body.time_secs.is_finite() || body.time_secs < 0.0 {
        return Err(AppError::BadRequest(
            "time_secs must be a non-negative number".to_string(),
        ));
    }
    let limits = &state.config.leaderboard;
    let entry = ScoreEntry {
        name: clean_text(body.name.as_deref(), "Anonymous", limits.max_name_chars),
        score: body.score,
        shots: body.shots,
        mode: clean_text(body.mode.as_deref(), "classic", limits.max_mode_chars),
        time_secs: body.time_secs,
        date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
    };

    let _persist = state.persist.lock().await;
    let (entries, pending_write) = {
        let mut store = state.scores.write().await;
        let rank = store.insert(entry.clone());
        tracing::info!(
            name = %entry.name,
            score = entry.score,
            rank = ?rank,
            "Score submitted"
        );
        let pending_write = match (rank, store.path()) {
            (Some(_), Some(path)) => {
                let json = store
                    .to_json()
                    .map_err(|e| AppError::Internal(format!("serialize leaderboard: {e}")))?;
                Some((path.to_path_buf(), json))
            },
            _ => None,
        };
        (store.entries().to_vec(), pending_write)
    };

    if let Some((path, json)) = pending_write {
        write_file(&path, json)
            .await
            .map_err(|e| AppError::Internal(format!("persist leaderboard: {e}")))?;
    }

    Ok((StatusCode::CREATED, Json(entries)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_limited() {
        assert_eq!(clean_text(Some("  ana  "), "Anonymous", 24), "ana");
        assert_eq!(clean_text(Some("   "), "Anonymous", 24), "Anonymous");
        assert_eq!(clean_text(None, "Anonymous", 24), "Anonymous");
        assert_eq!(clean_text(Some("abcdef"), "Anonymous", 3), "abc");
    }

    #[test]
    fn rejects_non_finite_discs() {
        let json = r#"{
            "striker": {"x": 300, "y": 498, "radius": 16, "mass": 2},
            "coins": [{"x": 300, "y": 300, "radius": 12, "mass": 1}]
        }"#;
        let mut req: AiShotRequest = serde_json::from_str(json).unwrap();
        assert!(validate_ai_request(&req, 64).is_ok());
        req.coins[0].vx = f32::INFINITY;
        assert!(matches!(
            validate_ai_request(&req, 64),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_oversized_board() {
        let json = r#"{"striker": {"x": 300, "y": 498, "radius": 16, "mass": 2}, "coins": []}"#;
        let mut req: AiShotRequest = serde_json::from_str(json).unwrap();
        req.coins = vec![req.striker.clone(); 5];
        assert!(validate_ai_request(&req, 4).is_err());
        assert!(validate_ai_request(&req, 5).is_ok());
    }
}
