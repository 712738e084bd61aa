//! Roshambo core game model
//!
//! Gestures, round outcomes, the append-only match ledger and the
//! computer's reactive move policy. Nothing in here knows about pixels.

pub mod gesture;
pub mod ledger;
pub mod strategy;

pub use gesture::{Gesture, GestureError, Outcome};
pub use ledger::{MatchLedger, Round, Tally};
pub use strategy::OpponentStrategy;
