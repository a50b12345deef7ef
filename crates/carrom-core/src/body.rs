use serde::{Deserialize, Serialize};

use crate::config::BoardConfig;
use crate::geometry::Vec2;

/// Role and color tag of a body. Renderers draw from this alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Striker,
    White,
    Black,
    Queen,
}

impl BodyKind {
    pub fn is_striker(self) -> bool {
        self == Self::Striker
    }

    pub fn is_coin(self) -> bool {
        !self.is_striker()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyStatus {
    #[default]
    Active,
    /// Pocketed. Terminal for coins; the striker never enters this state.
    Captured,
}

/// A disc on the board. Radius, mass, value and border are fixed by role at
/// construction and never looked up again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub kind: BodyKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// Points for the side that pockets this body.
    pub value: u32,
    /// Inset from each board edge that bounds this body's center.
    pub border: f32,
    pub status: BodyStatus,
}

impl Body {
    /// The striker, resting on the baseline.
    pub fn striker(board: &BoardConfig) -> Self {
        Self {
            kind: BodyKind::Striker,
            position: board.baseline,
            velocity: Vec2::ZERO,
            radius: board.striker_radius,
            mass: board.striker_mass,
            value: 0,
            border: board.striker_border,
            status: BodyStatus::Active,
        }
    }

    /// A coin of the given kind. `BodyKind::Striker` is not a coin and is
    /// built as a white coin; use [`Body::striker`] for the striker.
    pub fn coin(kind: BodyKind, position: Vec2, board: &BoardConfig) -> Self {
        let (kind, mass, value) = match kind {
            BodyKind::Queen => (kind, board.queen_mass, board.queen_value),
            BodyKind::White | BodyKind::Black => (kind, board.coin_mass, board.coin_value),
            BodyKind::Striker => (BodyKind::White, board.coin_mass, board.coin_value),
        };
        Self {
            kind,
            position,
            velocity: Vec2::ZERO,
            radius: board.coin_radius,
            mass,
            value,
            border: board.coin_border,
            status: BodyStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == BodyStatus::Active
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }

    /// Mark the body pocketed and stop it. Returns `false` if it was already
    /// captured, so callers can score exactly once.
    pub fn capture(&mut self) -> bool {
        if self.status == BodyStatus::Captured {
            return false;
        }
        self.status = BodyStatus::Captured;
        self.velocity = Vec2::ZERO;
        true
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}
