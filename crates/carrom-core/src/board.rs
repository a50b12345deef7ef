use serde::{Deserialize, Serialize};

use crate::body::{Body, BodyKind};
use crate::config::BoardConfig;
use crate::geometry::{Vec2, clamp, distance};

/// A corner capture zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub position: Vec2,
    pub radius: f32,
}

/// Static board geometry: square playing surface and four corner pockets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub size: f32,
    pub pockets: [Pocket; 4],
    pub baseline: Vec2,
}

impl Board {
    pub fn new(config: &BoardConfig) -> Self {
        let s = config.size;
        let i = config.pocket_inset;
        let r = config.pocket_radius;
        let pocket = |x, y| Pocket {
            position: Vec2::new(x, y),
            radius: r,
        };
        Self {
            size: s,
            pockets: [
                pocket(i, i),
                pocket(s - i, i),
                pocket(i, s - i),
                pocket(s - i, s - i),
            ],
            baseline: config.baseline,
        }
    }

    /// Inclusive range the center of a body with `border` may occupy on each axis.
    pub fn bounds(&self, border: f32) -> (f32, f32) {
        (border, self.size - border)
    }

    /// Whether `body`'s center lies inside its playable rectangle.
    pub fn contains(&self, body: &Body) -> bool {
        let (lo, hi) = self.bounds(body.border);
        (lo..=hi).contains(&body.position.x) && (lo..=hi).contains(&body.position.y)
    }

    /// Pull a body's center back into its playable rectangle without touching
    /// its velocity.
    pub fn contain(&self, body: &mut Body) {
        let (lo, hi) = self.bounds(body.border);
        body.position.x = clamp(body.position.x, lo, hi);
        body.position.y = clamp(body.position.y, lo, hi);
    }

    /// Index of the first pocket whose center is strictly closer than
    /// `pocket.radius - shrink` to `point`.
    pub fn pocket_within(&self, point: Vec2, shrink: f32) -> Option<usize> {
        self.pockets
            .iter()
            .position(|p| distance(point, p.position) < p.radius - shrink)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.size / 2.0, self.size / 2.0)
    }
}

/// Lay out the opening position: queen at the center, then each ring of coins
/// around it with colors alternating white/black.
pub fn seed_coins(config: &BoardConfig) -> Vec<Body> {
    let center = Vec2::new(config.size / 2.0, config.size / 2.0);
    let mut coins = vec![Body::coin(BodyKind::Queen, center, config)];

    let mut n = 0usize;
    for ring in &config.rings {
        for k in 0..ring.count {
            let angle = k as f32 / ring.count as f32 * std::f32::consts::TAU;
            let kind = if n % 2 == 0 {
                BodyKind::White
            } else {
                BodyKind::Black
            };
            coins.push(Body::coin(
                kind,
                center + Vec2::from_angle(angle) * ring.radius,
                config,
            ));
            n += 1;
        }
    }
    coins
}
