use crate::gesture::{Gesture, Outcome};

/// One completed exchange. Fields are private so a recorded round can't be
/// edited after the fact.
#[derive(Debug, Clone, PartialEq)]
pub struct Round<I> {
    index: usize,
    player: Gesture,
    computer: Gesture,
    captured_image: I,
}

impl<I> Round<I> {
    pub(crate) fn new(index: usize, player: Gesture, computer: Gesture, captured_image: I) -> Self {
        Self {
            index,
            player,
            computer,
            captured_image,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn player_move(&self) -> Gesture {
        self.player
    }

    pub fn computer_move(&self) -> Gesture {
        self.computer
    }

    pub fn captured_image(&self) -> &I {
        &self.captured_image
    }

    /// Outcome for the human player
    pub fn player_outcome(&self) -> Outcome {
        self.player.play(self.computer)
    }

    pub fn computer_won(&self) -> bool {
        self.computer.beats(self.player)
    }
}
