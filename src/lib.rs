//! Rock-paper-scissors against a webcam-watching opponent

pub mod config;
pub mod controller;
pub mod display;
pub mod timer;

pub use config::AppConfig;
pub use controller::{InteractionController, InteractionState, Step};
pub use display::{DisplaySurface, HighGuiDisplay, Scoreboard, VideoLayer};
pub use timer::SamplingTimer;
