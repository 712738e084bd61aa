//! Motion scoring and still-scene detection

pub mod stability;

pub use stability::{motion_score, StabilityConfig, StabilityDetector, StabilityState};
