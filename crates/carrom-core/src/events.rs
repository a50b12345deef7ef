use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::player::Side;

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner(Side),
    Draw,
}

/// Why the match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TargetScore,
    BoardCleared,
}

/// Events emitted by the match during a tick or an input call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    ShotTaken {
        side: Side,
        velocity: Vec2,
    },
    CoinCaptured {
        side: Side,
        coin: usize,
        value: u32,
        score: u32,
    },
    /// The striker dropped into a pocket and went back to the baseline.
    StrikerFoul {
        side: Side,
    },
    TurnResolved {
        next: Side,
        bonus: bool,
    },
    /// An AI decision arrived for a board that no longer exists or a turn
    /// that already passed.
    StaleDecisionDiscarded,
    MatchOver {
        outcome: MatchOutcome,
        reason: EndReason,
    },
}

/// Final tally handed to the leaderboard collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub scores: [u32; 2],
    pub shots: [u32; 2],
    pub outcome: MatchOutcome,
    pub reason: EndReason,
    pub ticks: u64,
}

impl MatchSummary {
    pub fn score_of(&self, side: Side) -> u32 {
        self.scores[side.index()]
    }

    pub fn shots_of(&self, side: Side) -> u32 {
        self.shots[side.index()]
    }
}
