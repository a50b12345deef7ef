use serde::{Deserialize, Serialize};

use carrom_core::config::{ShotConfig, ShotPolicy};
use carrom_core::geometry::Vec2;

/// Why a shot or drag was refused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotRejection {
    MatchOver,
    Paused,
    /// The board has not come to rest since the last shot.
    NotAiming,
    /// The side to act is not controlled by a human.
    NotYourTurn,
    /// An AI decision for this turn is outstanding.
    AiPending,
    /// The press started too far from the striker.
    OutOfReach,
    NoDrag,
    TooShort { length: f32 },
}

impl std::fmt::Display for ShotRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MatchOver => write!(f, "match is over"),
            Self::Paused => write!(f, "match is paused"),
            Self::NotAiming => write!(f, "board is still moving"),
            Self::NotYourTurn => write!(f, "not a human turn"),
            Self::AiPending => write!(f, "waiting on AI decision"),
            Self::OutOfReach => write!(f, "press is not on the striker"),
            Self::NoDrag => write!(f, "no drag in progress"),
            Self::TooShort { length } => write!(f, "drag too short: {length:.1}"),
        }
    }
}

impl std::error::Error for ShotRejection {}

/// An in-progress pointer drag, in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drag {
    pub start: Vec2,
    pub current: Vec2,
}

impl Drag {
    pub fn new(start: Vec2) -> Self {
        Self {
            start,
            current: start,
        }
    }

    /// Vector from the press point to the pointer.
    pub fn vector(&self) -> Vec2 {
        self.current - self.start
    }
}

/// Turn a drag vector into a launch velocity.
///
/// `Forward` launches along the drag with speed `min(len / power_span, 1) *
/// max_speed`. `Reverse` launches opposite the drag, scaled linearly.
pub fn translate(drag: Vec2, config: &ShotConfig) -> Result<Vec2, ShotRejection> {
    let length = drag.length();
    if !length.is_finite() || length < config.min_drag {
        return Err(ShotRejection::TooShort { length });
    }
    let velocity = match config.policy {
        ShotPolicy::Forward => {
            let power = (length / config.power_span).min(1.0);
            drag.normalized_or(Vec2::UNIT_X) * (power * config.max_speed)
        },
        ShotPolicy::Reverse => -drag * config.reverse_scale,
    };
    Ok(velocity)
}

/// Power meter fill in `[0, 1]` for the current drag.
pub fn power_fraction(drag: Vec2, config: &ShotConfig) -> f32 {
    if config.meter_span <= 0.0 {
        return 0.0;
    }
    (drag.length() / config.meter_span).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carrom_core::config::CarromConfig;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn forward_caps_at_max_speed() {
        let cfg = CarromConfig::classic().shot;
        let v = translate(Vec2::new(0.0, -400.0), &cfg).unwrap();
        assert!(approx(v.length(), cfg.max_speed));
        assert!(v.y < 0.0, "launches along the drag");
    }

    #[test]
    fn forward_scales_below_span() {
        let cfg = CarromConfig::classic().shot;
        let v = translate(Vec2::new(20.0, 0.0), &cfg).unwrap();
        assert!(approx(v.x, 20.0 / cfg.power_span * cfg.max_speed));
    }

    #[test]
    fn reverse_launches_opposite() {
        let cfg = CarromConfig::local().shot;
        let v = translate(Vec2::new(0.0, 80.0), &cfg).unwrap();
        assert!(approx(v.y, -80.0 * cfg.reverse_scale));
        assert!(approx(v.x, 0.0));
    }

    #[test]
    fn short_drag_rejected() {
        let cfg = CarromConfig::classic().shot;
        let err = translate(Vec2::new(3.0, 4.0), &cfg).unwrap_err();
        assert_eq!(err, ShotRejection::TooShort { length: 5.0 });
        assert!(translate(Vec2::new(cfg.min_drag, 0.0), &cfg).is_ok());
    }

    #[test]
    fn meter_is_clamped() {
        let cfg = CarromConfig::classic().shot;
        assert_eq!(power_fraction(Vec2::ZERO, &cfg), 0.0);
        assert_eq!(power_fraction(Vec2::new(1000.0, 0.0), &cfg), 1.0);
        let half = power_fraction(Vec2::new(cfg.meter_span / 2.0, 0.0), &cfg);
        assert!(approx(half, 0.5));
    }
}
