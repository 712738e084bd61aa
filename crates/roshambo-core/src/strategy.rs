//! The computer's move policy
//!
//! Opens with paper. After a computer win it repeats the move the player just
//! lost with; after a draw or a computer loss it switches to the gesture that
//! neither side played last round.

use crate::gesture::Gesture;
use crate::ledger::MatchLedger;

#[derive(Debug, Clone, Copy, Default)]
pub struct OpponentStrategy;

impl OpponentStrategy {
    pub const OPENING: Gesture = Gesture::Paper;

    pub fn new() -> Self {
        Self
    }

    pub fn next_move<I>(&self, ledger: &MatchLedger<I>) -> Gesture {
        let Some(last) = ledger.last() else {
            return Self::OPENING;
        };

        let player = last.player_move();
        let computer = last.computer_move();

        if last.computer_won() {
            return player;
        }

        // Draw and loss share a branch. When both moves are equal two gestures
        // qualify and the first in canonical order is taken.
        Gesture::ALL
            .into_iter()
            .find(|&g| g != player && g != computer)
            .unwrap_or(Self::OPENING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Gesture::*;

    fn after(player: Gesture, computer: Gesture) -> Gesture {
        let mut ledger = MatchLedger::new();
        ledger.append_round(player, computer, ());
        OpponentStrategy::new().next_move(&ledger)
    }

    #[test]
    fn test_opening_move() {
        let ledger: MatchLedger<()> = MatchLedger::new();
        assert_eq!(OpponentStrategy::new().next_move(&ledger), Paper);
    }

    #[test]
    fn test_repeats_players_losing_move() {
        assert_eq!(after(Rock, Paper), Rock);
        assert_eq!(after(Paper, Scissors), Paper);
        assert_eq!(after(Scissors, Rock), Scissors);
    }

    #[test]
    fn test_draw_picks_first_unplayed() {
        assert_eq!(after(Rock, Rock), Paper);
        assert_eq!(after(Paper, Paper), Rock);
        assert_eq!(after(Scissors, Scissors), Rock);
    }

    #[test]
    fn test_loss_picks_third_gesture() {
        assert_eq!(after(Paper, Rock), Scissors);
        assert_eq!(after(Scissors, Paper), Rock);
        assert_eq!(after(Rock, Scissors), Paper);
    }

    #[test]
    fn test_only_last_round_matters() {
        let mut ledger = MatchLedger::new();
        ledger.append_round(Rock, Paper, ());
        ledger.append_round(Scissors, Rock, ());
        assert_eq!(OpponentStrategy::new().next_move(&ledger), Scissors);
    }
}
