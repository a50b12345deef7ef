use carrom_core::events::{EndReason, MatchOutcome};
use carrom_core::player::Side;

/// Higher score wins; equal scores draw.
pub fn decide(scores: [u32; 2]) -> MatchOutcome {
    match scores[0].cmp(&scores[1]) {
        std::cmp::Ordering::Greater => MatchOutcome::Winner(Side::One),
        std::cmp::Ordering::Less => MatchOutcome::Winner(Side::Two),
        std::cmp::Ordering::Equal => MatchOutcome::Draw,
    }
}

/// Whether the match should end. A reached target takes precedence over an
/// empty board when both happen on the same shot.
pub fn end_reason(
    scores: [u32; 2],
    target: Option<u32>,
    coins_remaining: usize,
) -> Option<EndReason> {
    if target.is_some_and(|t| scores.iter().any(|&s| s >= t)) {
        return Some(EndReason::TargetScore);
    }
    if coins_remaining == 0 {
        return Some(EndReason::BoardCleared);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_score_wins() {
        assert_eq!(decide([30, 10]), MatchOutcome::Winner(Side::One));
        assert_eq!(decide([0, 5]), MatchOutcome::Winner(Side::Two));
        assert_eq!(decide([7, 7]), MatchOutcome::Draw);
    }

    #[test]
    fn target_reached() {
        assert_eq!(end_reason([10, 3], Some(10), 4), Some(EndReason::TargetScore));
        assert_eq!(end_reason([9, 3], Some(10), 4), None);
    }

    #[test]
    fn board_cleared_without_target() {
        assert_eq!(end_reason([0, 0], None, 0), Some(EndReason::BoardCleared));
        assert_eq!(end_reason([100, 0], None, 1), None);
    }

    #[test]
    fn target_wins_tie_with_clear() {
        assert_eq!(end_reason([10, 0], Some(10), 0), Some(EndReason::TargetScore));
    }
}
