use rand::Rng;

use carrom_core::body::Body;
use carrom_core::config::Difficulty;
use carrom_core::geometry::{Vec2, distance};

/// Aim and power spread for the heuristic bot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotParams {
    /// Total width of the uniform angle error, in radians.
    pub angle_jitter: f32,
    /// Speed range as fractions of `max_speed`.
    pub power: (f32, f32),
}

pub fn params_for(difficulty: Difficulty) -> BotParams {
    match difficulty {
        Difficulty::Easy => BotParams {
            angle_jitter: 0.6,
            power: (0.6, 1.0),
        },
        Difficulty::Normal => BotParams {
            angle_jitter: 0.3,
            power: (1.0, 1.33),
        },
        Difficulty::Hard => BotParams {
            angle_jitter: 0.1,
            power: (1.1, 1.33),
        },
    }
}

/// Aim at the active coin nearest `home`, with difficulty-scaled error.
/// Returns `None` when no coin is left.
pub fn choose_shot<R: Rng>(
    striker: &Body,
    coins: &[Body],
    home: Vec2,
    difficulty: Difficulty,
    max_speed: f32,
    rng: &mut R,
) -> Option<Vec2> {
    let target = coins
        .iter()
        .filter(|c| c.is_active())
        .min_by(|a, b| distance(a.position, home).total_cmp(&distance(b.position, home)))?;

    let params = params_for(difficulty);
    let half = params.angle_jitter / 2.0;
    let aim = (target.position - striker.position).angle();
    let angle = if half > 0.0 {
        aim + rng.random_range(-half..half)
    } else {
        aim
    };
    let (lo, hi) = params.power;
    let speed = max_speed * rng.random_range(lo..hi);
    Some(Vec2::from_angle(angle) * speed)
}

/// Random shot used when no better decision is available.
pub fn fallback_shot<R: Rng>(max_speed: f32, rng: &mut R) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let speed = max_speed * rng.random_range(0.5..0.9);
    Vec2::from_angle(angle) * speed
}
