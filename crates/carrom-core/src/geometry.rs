use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A 2D point or vector in board-local coordinates (y grows downward).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Unit x-axis, used as the collision normal when two centers coincide.
    pub const UNIT_X: Self = Self::new(1.0, 0.0);

    /// Unit vector at `angle` radians (0 = +X).
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Unit vector in the same direction, or `fallback` for a zero vector.
    pub fn normalized_or(self, fallback: Self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            Self::new(self.x / len, self.y / len)
        } else {
            fallback
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Clamp `v` into `[lo, hi]`. Unlike `f32::clamp` this never panics when the
/// bounds are inverted; `lo` wins.
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    lo.max(hi.min(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::ZERO;
        assert!((distance(a, b) - 5.0).abs() < 1e-6);
        assert!((distance(b, a) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn clamp_handles_inverted_bounds() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(5.0, 10.0, 0.0), 10.0);
    }

    #[test]
    fn normalized_zero_uses_fallback() {
        assert_eq!(Vec2::ZERO.normalized_or(Vec2::UNIT_X), Vec2::UNIT_X);
        let n = Vec2::new(0.0, -2.0).normalized_or(Vec2::UNIT_X);
        assert!((n.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn from_angle_roundtrips_through_angle() {
        let v = Vec2::from_angle(1.2);
        assert!((v.angle() - 1.2).abs() < 1e-5);
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn non_finite_detected() {
        assert!(Vec2::new(1.0, 2.0).is_finite());
        assert!(!Vec2::new(f32::NAN, 0.0).is_finite());
        assert!(!Vec2::new(0.0, f32::INFINITY).is_finite());
    }
}
