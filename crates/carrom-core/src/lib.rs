pub mod board;
pub mod body;
pub mod config;
pub mod events;
pub mod geometry;
pub mod player;
pub mod protocol;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::board::Board;
    use crate::body::{Body, BodyKind};
    use crate::config::{BoardConfig, CarromConfig};
    use crate::geometry::Vec2;

    /// Classic config with no seeded coins, for hand-placed scenarios.
    pub fn empty_board_config() -> CarromConfig {
        let mut config = CarromConfig::classic();
        config.board.rings.clear();
        config
    }

    /// A white coin at `(x, y)` using the default board constants.
    pub fn coin_at(x: f32, y: f32) -> Body {
        Body::coin(BodyKind::White, Vec2::new(x, y), &BoardConfig::default())
    }

    /// A striker at `(x, y)` using the default board constants.
    pub fn striker_at(x: f32, y: f32) -> Body {
        Body {
            position: Vec2::new(x, y),
            ..Body::striker(&BoardConfig::default())
        }
    }

    /// Assert every active body is finite and inside its playable rectangle.
    pub fn assert_bodies_contained(board: &Board, bodies: &[Body]) {
        for (i, body) in bodies.iter().enumerate() {
            if !body.is_active() {
                continue;
            }
            assert!(body.is_finite(), "body {i} is not finite: {body:?}");
            let (lo, hi) = board.bounds(body.border);
            let eps = 1e-3;
            assert!(
                body.position.x >= lo - eps
                    && body.position.x <= hi + eps
                    && body.position.y >= lo - eps
                    && body.position.y <= hi + eps,
                "body {i} escaped the board: {:?} not in [{lo}, {hi}]",
                body.position
            );
        }
    }

    /// Total linear momentum of a set of bodies.
    pub fn total_momentum<'a>(bodies: impl IntoIterator<Item = &'a Body>) -> Vec2 {
        bodies
            .into_iter()
            .fold(Vec2::ZERO, |acc, b| acc + b.momentum())
    }
}
