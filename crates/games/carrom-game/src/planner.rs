//! Search-based shot selection for the decision service.
//!
//! Candidate shots are simulated on a copy of the board with the real
//! stepper and scored by what they pocket.

use rand::Rng;

use carrom_core::board::Board;
use carrom_core::body::Body;
use carrom_core::config::{CarromConfig, Difficulty};
use carrom_core::geometry::{Vec2, distance};
use carrom_core::protocol::AiShotRequest;

use crate::{physics, settle};

/// Angular step between candidate aims, in radians.
const ANGLE_STEP: f32 = 0.15;
/// Planner power units to striker speed.
const POWER_TO_SPEED: f32 = 0.3;
/// Penalty per unit of residual coin speed.
const MOTION_PENALTY: f32 = 0.05;
/// Bonus when the striker ends the lookahead slow.
const STRIKER_PARKED_BONUS: f32 = 5.0;
const STRIKER_PARKED_SPEED: f32 = 1.0;
const FOUL_PENALTY: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerParams {
    /// Ticks simulated per candidate.
    pub depth: u32,
    /// Number of angular offsets on each side of the direct aim.
    pub angles: i32,
    pub powers: &'static [f32],
    /// Uniform noise added to each velocity component of the chosen shot.
    pub noise: f32,
    /// How many of the nearest coins to consider.
    pub targets: usize,
}

pub fn params_for(difficulty: Difficulty) -> PlannerParams {
    match difficulty {
        Difficulty::Easy => PlannerParams {
            depth: 8,
            angles: 3,
            powers: &[6.0, 10.0, 14.0],
            noise: 0.8,
            targets: 1,
        },
        Difficulty::Normal => PlannerParams {
            depth: 15,
            angles: 6,
            powers: &[6.0, 10.0, 14.0, 18.0],
            noise: 0.4,
            targets: 3,
        },
        Difficulty::Hard => PlannerParams {
            depth: 22,
            angles: 9,
            powers: &[6.0, 10.0, 14.0, 18.0, 22.0],
            noise: 0.15,
            targets: 4,
        },
    }
}

/// A candidate shot and its simulated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub velocity: Vec2,
    pub score: f32,
}

/// Pick a striker velocity for the board in `request`. Returns zero velocity
/// when no coin is left.
pub fn plan_shot<R: Rng>(request: &AiShotRequest, config: &CarromConfig, rng: &mut R) -> Vec2 {
    let striker = request.striker.to_body(true, &config.board);
    let coins: Vec<Body> = request
        .coins
        .iter()
        .map(|c| c.to_body(false, &config.board))
        .collect();

    let params = params_for(request.difficulty);
    let Some(best) = best_candidate(&striker, &coins, config, &params) else {
        return Vec2::ZERO;
    };
    tracing::debug!(
        difficulty = request.difficulty.as_str(),
        score = best.score,
        vx = best.velocity.x,
        vy = best.velocity.y,
        "Planner chose shot"
    );
    if params.noise <= 0.0 {
        return best.velocity;
    }
    best.velocity
        + Vec2::new(
            rng.random_range(-params.noise..params.noise),
            rng.random_range(-params.noise..params.noise),
        )
}

/// Search every candidate and return the highest scoring. Ties keep the
/// first candidate found.
pub fn best_candidate(
    striker: &Body,
    coins: &[Body],
    config: &CarromConfig,
    params: &PlannerParams,
) -> Option<Candidate> {
    let mut targets: Vec<&Body> = coins.iter().filter(|c| c.is_active()).collect();
    if targets.is_empty() {
        return None;
    }
    targets.sort_by(|a, b| {
        distance(a.position, striker.position).total_cmp(&distance(b.position, striker.position))
    });
    targets.truncate(params.targets.max(1));

    let board = Board::new(&config.board);
    let mut best: Option<Candidate> = None;
    for target in targets {
        let aim = (target.position - striker.position).angle();
        for k in -params.angles / 2..=params.angles / 2 {
            let angle = aim + k as f32 * ANGLE_STEP;
            for &power in params.powers {
                let velocity = Vec2::from_angle(angle) * (power * POWER_TO_SPEED);
                let score = simulate(striker, coins, velocity, &board, config, params.depth);
                if best.is_none_or(|b| score > b.score) {
                    best = Some(Candidate { velocity, score });
                }
            }
        }
    }
    best
}

/// Run `depth` ticks of a candidate shot and score the outcome.
fn simulate(
    striker: &Body,
    coins: &[Body],
    velocity: Vec2,
    board: &Board,
    config: &CarromConfig,
    depth: u32,
) -> f32 {
    let mut striker = striker.clone();
    striker.velocity = velocity;
    let mut coins = coins.to_vec();
    let mut gained = 0u32;
    let mut fouled = false;

    for _ in 0..depth {
        match physics::step(board, &config.physics, &mut striker, &mut coins) {
            Ok(report) => {
                gained += report.captured.iter().map(|&i| coins[i].value).sum::<u32>();
                fouled |= report.striker_foul;
            },
            Err(_) => return f32::NEG_INFINITY,
        }
        if settle::is_settled(&striker, &coins, config.physics.settle_threshold) {
            break;
        }
    }

    let residual: f32 = coins
        .iter()
        .filter(|c| c.is_active())
        .map(|c| c.velocity.x.abs() + c.velocity.y.abs())
        .sum();
    let mut score = gained as f32 - MOTION_PENALTY * residual;
    if striker.velocity.x.abs() + striker.velocity.y.abs() < STRIKER_PARKED_SPEED {
        score += STRIKER_PARKED_BONUS;
    }
    if fouled {
        score -= FOUL_PENALTY;
    }
    score
}
