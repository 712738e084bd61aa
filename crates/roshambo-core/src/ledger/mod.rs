//! Append-only match history

mod round;

pub use round::Round;

use crate::gesture::{Gesture, Outcome};
use serde::{Deserialize, Serialize};

/// Win/draw/loss counts from the player's side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.wins + self.draws + self.losses
    }
}

/// Ordered record of every round played this session.
///
/// Insertion order is play order; the only mutation is [`MatchLedger::append_round`].
#[derive(Debug, Clone)]
pub struct MatchLedger<I> {
    rounds: Vec<Round<I>>,
}

impl<I> MatchLedger<I> {
    pub fn new() -> Self {
        Self { rounds: Vec::new() }
    }

    /// Record a round under the next ordinal index and return it
    pub fn append_round(&mut self, player: Gesture, computer: Gesture, captured_image: I) -> &Round<I> {
        let index = self.rounds.len();
        self.rounds.push(Round::new(index, player, computer, captured_image));
        &self.rounds[index]
    }

    pub fn rounds(&self) -> &[Round<I>] {
        &self.rounds
    }

    pub fn last(&self) -> Option<&Round<I>> {
        self.rounds.last()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn tally(&self) -> Tally {
        let mut tally = Tally::default();
        for round in &self.rounds {
            match round.player_outcome() {
                Outcome::Win => tally.wins += 1,
                Outcome::Draw => tally.draws += 1,
                Outcome::Loss => tally.losses += 1,
            }
        }
        tally
    }

    /// Player win percentage in [0, 100], counting draws as half; 0 when empty
    pub fn win_rate(&self) -> f64 {
        if self.rounds.is_empty() {
            return 0.0;
        }

        let points: f64 = self
            .rounds
            .iter()
            .map(|round| round.player_outcome().score())
            .sum();

        100.0 * points / self.rounds.len() as f64
    }
}

impl<I> Default for MatchLedger<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Gesture::*;

    #[test]
    fn test_empty_ledger() {
        let ledger: MatchLedger<()> = MatchLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.win_rate(), 0.0);
        assert!(ledger.last().is_none());
    }

    #[test]
    fn test_append_assigns_ordinals() {
        let mut ledger = MatchLedger::new();
        ledger.append_round(Rock, Paper, "a");
        ledger.append_round(Scissors, Paper, "b");
        let third = ledger.append_round(Paper, Paper, "c");
        assert_eq!(third.index(), 2);

        let indices: Vec<_> = ledger.rounds().iter().map(|r| r.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(*ledger.last().unwrap().captured_image(), "c");
    }

    #[test]
    fn test_win_rate_counts_draws_as_half() {
        let mut ledger = MatchLedger::new();
        ledger.append_round(Rock, Scissors, ()); // win
        ledger.append_round(Rock, Rock, ()); // draw
        ledger.append_round(Rock, Paper, ()); // loss
        ledger.append_round(Paper, Rock, ()); // win

        let tally = ledger.tally();
        assert_eq!(tally, Tally { wins: 2, draws: 1, losses: 1 });
        let expected = 100.0 * (tally.wins as f64 + 0.5 * tally.draws as f64) / tally.total() as f64;
        assert!((ledger.win_rate() - expected).abs() < 1e-9);
        assert!((ledger.win_rate() - 62.5).abs() < 1e-9);
    }

    #[test]
    fn test_win_rate_bounds_over_all_pairs() {
        let mut ledger = MatchLedger::new();
        for player in Gesture::ALL {
            for computer in Gesture::ALL {
                ledger.append_round(player, computer, ());
                let rate = ledger.win_rate();
                assert!((0.0..=100.0).contains(&rate));
            }
        }
        // every pairing once: 3 wins, 3 draws, 3 losses
        assert!((ledger.win_rate() - 50.0).abs() < 1e-9);
    }
}
