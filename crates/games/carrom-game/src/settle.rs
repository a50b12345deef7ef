use carrom_core::body::Body;

/// A body is at rest when both velocity components are below `threshold`.
/// Captured bodies are always at rest.
pub fn at_rest(body: &Body, threshold: f32) -> bool {
    !body.is_active() || (body.velocity.x.abs() < threshold && body.velocity.y.abs() < threshold)
}

/// Whether the striker and every active coin are at rest.
pub fn is_settled(striker: &Body, coins: &[Body], threshold: f32) -> bool {
    at_rest(striker, threshold) && coins.iter().all(|c| at_rest(c, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use carrom_core::geometry::Vec2;
    use carrom_core::test_helpers::{coin_at, striker_at};

    #[test]
    fn per_axis_threshold() {
        let mut s = striker_at(300.0, 300.0);
        s.velocity = Vec2::new(0.19, 0.19);
        assert!(at_rest(&s, 0.2));
        s.velocity = Vec2::new(0.0, -0.21);
        assert!(!at_rest(&s, 0.2));
    }

    #[test]
    fn captured_coin_ignored() {
        let s = striker_at(300.0, 300.0);
        let mut c = coin_at(100.0, 100.0);
        c.velocity = Vec2::new(5.0, 0.0);
        assert!(!is_settled(&s, std::slice::from_ref(&c), 0.2));
        c.capture();
        c.velocity = Vec2::new(5.0, 0.0);
        assert!(is_settled(&s, &[c], 0.2));
    }
}
