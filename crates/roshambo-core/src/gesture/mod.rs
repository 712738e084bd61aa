//! Hand gestures and the beats relation between them

mod outcome;

pub use outcome::Outcome;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GestureError {
    #[error("class id {0} does not name a gesture")]
    UnknownClass(i64),
}

/// One of the three playable hand shapes, encoded as 0/1/2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gesture {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

impl Gesture {
    /// Canonical ordering, used wherever a deterministic pick is needed
    pub const ALL: [Gesture; 3] = [Gesture::Rock, Gesture::Paper, Gesture::Scissors];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Map a detector class id onto a gesture
    pub fn from_class_id(class_id: i64) -> Result<Self, GestureError> {
        match class_id {
            0 => Ok(Gesture::Rock),
            1 => Ok(Gesture::Paper),
            2 => Ok(Gesture::Scissors),
            other => Err(GestureError::UnknownClass(other)),
        }
    }

    /// `i` beats `(i + 2) mod 3`
    pub fn beats(self, other: Gesture) -> bool {
        (self.index() + 2) % 3 == other.index()
    }

    /// Outcome of a round from the point of view of `self`
    pub fn play(self, other: Gesture) -> Outcome {
        if self == other {
            Outcome::Draw
        } else if self.beats(other) {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Gesture::Rock => "rock",
            Gesture::Paper => "paper",
            Gesture::Scissors => "scissors",
        }
    }

    /// Overlay colour used when drawing this gesture's box
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Gesture::Rock => (239, 71, 111),
            Gesture::Paper => (6, 214, 160),
            Gesture::Scissors => (17, 138, 178),
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i64> for Gesture {
    type Error = GestureError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_class_id(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beats_cycle() {
        assert!(Gesture::Rock.beats(Gesture::Scissors));
        assert!(Gesture::Paper.beats(Gesture::Rock));
        assert!(Gesture::Scissors.beats(Gesture::Paper));

        for g in Gesture::ALL {
            assert!(!g.beats(g));
            let beaten_by = Gesture::ALL.iter().filter(|other| other.beats(g)).count();
            assert_eq!(beaten_by, 1);
        }
    }

    #[test]
    fn test_play_outcomes() {
        assert_eq!(Gesture::Rock.play(Gesture::Scissors), Outcome::Win);
        assert_eq!(Gesture::Rock.play(Gesture::Paper), Outcome::Loss);
        assert_eq!(Gesture::Paper.play(Gesture::Paper), Outcome::Draw);
    }

    #[test]
    fn test_class_id_mapping() {
        assert_eq!(Gesture::from_class_id(0), Ok(Gesture::Rock));
        assert_eq!(Gesture::try_from(2), Ok(Gesture::Scissors));
        assert_eq!(Gesture::from_class_id(3), Err(GestureError::UnknownClass(3)));
        assert!(Gesture::from_class_id(-1).is_err());
    }
}
