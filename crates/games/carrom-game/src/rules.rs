use serde::{Deserialize, Serialize};

use carrom_core::config::RulesConfig;
use carrom_core::events::{EndReason, MatchOutcome};
use carrom_core::player::Side;

use crate::scoring;
use crate::shot::ShotRejection;

/// Where the match is in the shot cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Aiming,
    ShotInFlight,
    /// At rest for `rest_ticks` consecutive ticks.
    Settling {
        rest_ticks: u32,
    },
    MatchOver {
        outcome: MatchOutcome,
        reason: EndReason,
    },
}

/// Result of resolving a settled shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResolution {
    Next { side: Side, bonus: bool },
    Over { outcome: MatchOutcome, reason: EndReason },
}

/// Turn and score bookkeeping. Knows nothing about physics; the match feeds
/// it captures and rest observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnState {
    pub side: Side,
    pub phase: Phase,
    pub scores: [u32; 2],
    pub shots: [u32; 2],
    /// Coins captured since the current shot was taken.
    pub captured_this_shot: u32,
    /// Monotonic turn number, bumped on every resolution.
    pub turn: u64,
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            side: Side::One,
            phase: Phase::Aiming,
            scores: [0; 2],
            shots: [0; 2],
            captured_this_shot: 0,
            turn: 0,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::MatchOver { .. })
    }

    /// Whether bodies are still expected to be moving from a shot.
    pub fn shot_active(&self) -> bool {
        matches!(self.phase, Phase::ShotInFlight | Phase::Settling { .. })
    }

    /// Check that a shot may be taken now.
    pub fn ready_for_shot(&self) -> Result<(), ShotRejection> {
        match self.phase {
            Phase::Aiming => Ok(()),
            Phase::MatchOver { .. } => Err(ShotRejection::MatchOver),
            Phase::ShotInFlight | Phase::Settling { .. } => Err(ShotRejection::NotAiming),
        }
    }

    /// Record a shot by the side to act.
    pub fn begin_shot(&mut self) -> Result<(), ShotRejection> {
        self.ready_for_shot()?;
        self.shots[self.side.index()] += 1;
        self.captured_this_shot = 0;
        self.phase = Phase::ShotInFlight;
        Ok(())
    }

    /// Credit a captured coin to the side to act. Returns the new score.
    pub fn record_capture(&mut self, value: u32) -> u32 {
        let score = &mut self.scores[self.side.index()];
        *score = score.saturating_add(value);
        self.captured_this_shot += 1;
        *score
    }

    /// Feed one tick's rest observation. Returns `true` once rest has held
    /// for `settle_ticks` consecutive ticks and the turn should resolve.
    pub fn observe_rest(&mut self, at_rest: bool, settle_ticks: u32) -> bool {
        let needed = settle_ticks.max(1);
        match (self.phase, at_rest) {
            (Phase::ShotInFlight, true) => {
                self.phase = Phase::Settling { rest_ticks: 1 };
                1 >= needed
            },
            (Phase::Settling { rest_ticks }, true) => {
                let rest_ticks = rest_ticks + 1;
                self.phase = Phase::Settling { rest_ticks };
                rest_ticks >= needed
            },
            (Phase::Settling { .. }, false) => {
                self.phase = Phase::ShotInFlight;
                false
            },
            _ => false,
        }
    }

    /// Move to `MatchOver` if the end condition holds. Used at turn
    /// resolution and for captures made while no shot is active.
    pub fn check_end(
        &mut self,
        rules: &RulesConfig,
        coins_remaining: usize,
    ) -> Option<TurnResolution> {
        if self.is_over() {
            return None;
        }
        let reason = scoring::end_reason(self.scores, rules.target_score, coins_remaining)?;
        let outcome = scoring::decide(self.scores);
        self.phase = Phase::MatchOver { outcome, reason };
        Some(TurnResolution::Over { outcome, reason })
    }

    /// Close out the shot: end the match, grant a bonus shot, or rotate.
    pub fn resolve(&mut self, rules: &RulesConfig, coins_remaining: usize) -> TurnResolution {
        self.turn += 1;
        if let Some(over) = self.check_end(rules, coins_remaining) {
            return over;
        }
        let bonus = rules.bonus_shot_on_capture && self.captured_this_shot > 0;
        if !bonus {
            self.side = self.side.other();
        }
        self.captured_this_shot = 0;
        self.phase = Phase::Aiming;
        TurnResolution::Next {
            side: self.side,
            bonus,
        }
    }
}
