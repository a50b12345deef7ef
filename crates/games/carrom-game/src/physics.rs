use carrom_core::board::Board;
use carrom_core::body::Body;
use carrom_core::config::PhysicsConfig;
use carrom_core::geometry::{Vec2, clamp};

use crate::collision;

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Indices of coins captured this tick, in index order.
    pub captured: Vec<usize>,
    /// The striker entered a pocket and was returned to the baseline.
    pub striker_foul: bool,
    /// Number of disc contacts resolved.
    pub contacts: u32,
}

/// A tick produced a non-finite position or velocity. The bodies have been
/// restored to their state before the tick.
#[derive(Debug, Clone, PartialEq)]
pub enum StepError {
    NonFinite { striker: bool, coin: Option<usize> },
}

impl std::fmt::Display for StepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite {
                striker: true,
                coin: _,
            } => write!(f, "striker state became non-finite"),
            Self::NonFinite { coin: Some(i), .. } => {
                write!(f, "coin {i} state became non-finite")
            },
            Self::NonFinite { .. } => write!(f, "body state became non-finite"),
        }
    }
}

impl std::error::Error for StepError {}

/// Advance the board by one tick.
///
/// Order: integrate, damp, reflect off the rim, resolve striker contacts,
/// resolve coin pairs, pull stragglers back inside, then check pockets.
/// Captured coins are skipped everywhere. On a non-finite result every body
/// is rolled back and an error is returned.
pub fn step(
    board: &Board,
    physics: &PhysicsConfig,
    striker: &mut Body,
    coins: &mut [Body],
) -> Result<StepReport, StepError> {
    let striker_before = striker.clone();
    let coins_before = coins.to_vec();

    let report = step_unchecked(board, physics, striker, coins);

    let bad_coin = coins.iter().position(|c| !c.is_finite());
    let bad_striker = !striker.is_finite();
    if bad_striker || bad_coin.is_some() {
        *striker = striker_before;
        coins.clone_from_slice(&coins_before);
        let err = StepError::NonFinite {
            striker: bad_striker,
            coin: bad_coin,
        };
        tracing::error!(error = %err, "Physics step rolled back");
        return Err(err);
    }
    Ok(report)
}

fn step_unchecked(
    board: &Board,
    physics: &PhysicsConfig,
    striker: &mut Body,
    coins: &mut [Body],
) -> StepReport {
    let mut report = StepReport::default();

    move_body(board, physics, striker);
    for coin in coins.iter_mut().filter(|c| c.is_active()) {
        move_body(board, physics, coin);
    }

    for coin in coins.iter_mut().filter(|c| c.is_active()) {
        if collision::striker_hits_coin(striker, coin, physics.separation_epsilon) {
            report.contacts += 1;
        }
    }

    for i in 0..coins.len() {
        let (head, tail) = coins.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.is_active() {
            continue;
        }
        for b in tail.iter_mut().filter(|c| c.is_active()) {
            if collision::coin_hits_coin(a, b) {
                report.contacts += 1;
            }
        }
    }

    // Separation can push a disc past the rim.
    board.contain(striker);
    for coin in coins.iter_mut().filter(|c| c.is_active()) {
        board.contain(coin);
    }

    for (i, coin) in coins.iter_mut().enumerate() {
        if !coin.is_active() {
            continue;
        }
        let Some(pocket) = board.pocket_within(coin.position, coin.radius) else {
            continue;
        };
        if coin.capture() {
            tracing::debug!(coin = i, pocket, value = coin.value, "Coin pocketed");
            report.captured.push(i);
        }
    }

    if board.pocket_within(striker.position, 0.0).is_some() {
        tracing::debug!("Striker pocketed, returning to baseline");
        striker.position = board.baseline;
        striker.velocity = Vec2::ZERO;
        report.striker_foul = true;
    }

    report
}

/// Integrate, damp, and reflect a single body.
fn move_body(board: &Board, physics: &PhysicsConfig, body: &mut Body) {
    body.position += body.velocity;
    body.velocity *= physics.friction;
    body.velocity *= physics.air_resistance;

    let (lo, hi) = board.bounds(body.border);
    if body.position.x < lo || body.position.x > hi {
        body.velocity.x *= -physics.restitution;
        body.position.x = clamp(body.position.x, lo, hi);
    }
    if body.position.y < lo || body.position.y > hi {
        body.velocity.y *= -physics.restitution;
        body.position.y = clamp(body.position.y, lo, hi);
    }
}
