//! Frame-to-frame stability detection

use image::RgbaImage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Motion scores below this count as "not moving"
    pub movement_threshold: f64,
    /// Consecutive still samples needed before a frame is emitted
    pub stable_frame_threshold: u32,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            movement_threshold: 0.010,
            stable_frame_threshold: 5,
        }
    }
}

impl StabilityConfig {
    /// A zero still-sample threshold could never complete a run
    pub fn validate(&self) -> crate::Result<()> {
        if self.stable_frame_threshold == 0 {
            anyhow::bail!("stable_frame_threshold must be at least 1");
        }
        Ok(())
    }
}

/// Previous frame and the current run of still samples
#[derive(Debug, Clone, Default)]
pub struct StabilityState {
    pub previous: Option<RgbaImage>,
    pub stable_count: u32,
}

/// Mean absolute red-channel difference normalised to [0, 1].
///
/// Frames of different size score 1.0.
pub fn motion_score(previous: &RgbaImage, current: &RgbaImage) -> f64 {
    if previous.dimensions() != current.dimensions() {
        return 1.0;
    }

    let (width, height) = current.dimensions();
    let pixels = width as u64 * height as u64;
    if pixels == 0 {
        return 0.0;
    }

    let diff = red_channel_diff(previous.as_raw(), current.as_raw());
    diff as f64 / (pixels * 255) as f64
}

#[cfg(not(feature = "parallel"))]
fn red_channel_diff(a: &[u8], b: &[u8]) -> u64 {
    a.chunks_exact(4)
        .zip(b.chunks_exact(4))
        .map(|(pa, pb)| pa[0].abs_diff(pb[0]) as u64)
        .sum()
}

#[cfg(feature = "parallel")]
fn red_channel_diff(a: &[u8], b: &[u8]) -> u64 {
    use rayon::prelude::*;
    a.par_chunks_exact(4)
        .zip(b.par_chunks_exact(4))
        .map(|(pa, pb)| pa[0].abs_diff(pb[0]) as u64)
        .sum()
}

/// Emits a snapshot once the scene has been still for long enough
#[derive(Debug, Clone, Default)]
pub struct StabilityDetector {
    config: StabilityConfig,
    state: StabilityState,
}

impl StabilityDetector {
    pub fn new(config: StabilityConfig) -> Self {
        Self {
            config,
            state: StabilityState::default(),
        }
    }

    pub fn state(&self) -> &StabilityState {
        &self.state
    }

    pub fn stable_count(&self) -> u32 {
        self.state.stable_count
    }

    /// Forget the previous frame and the current run
    pub fn reset(&mut self) {
        self.state = StabilityState::default();
    }

    /// Feed one snapshot; returns it as the candidate gesture image on the
    /// sample that completes a still run. Later still samples in the same run
    /// return `None`.
    pub fn observe(&mut self, frame: RgbaImage) -> Option<RgbaImage> {
        let Some(previous) = self.state.previous.take() else {
            self.state.previous = Some(frame);
            return None;
        };

        let score = motion_score(&previous, &frame);
        log::trace!("motion score {:.5}", score);

        let mut emitted = None;
        if score < self.config.movement_threshold {
            self.state.stable_count = self.state.stable_count.saturating_add(1);
            if self.state.stable_count == self.config.stable_frame_threshold {
                log::debug!("Scene stable for {} samples", self.state.stable_count);
                emitted = Some(frame.clone());
            }
        } else {
            self.state.stable_count = 0;
        }

        self.state.previous = Some(frame);
        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn flat(red: u8) -> RgbaImage {
        RgbaImage::from_pixel(8, 6, Rgba([red, 0, 0, 255]))
    }

    #[test]
    fn test_motion_score_normalised() {
        assert_eq!(motion_score(&flat(0), &flat(0)), 0.0);
        assert_eq!(motion_score(&flat(0), &flat(255)), 1.0);
        assert!((motion_score(&flat(100), &flat(151)) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_motion_score_ignores_other_channels() {
        let a = RgbaImage::from_pixel(4, 4, Rgba([10, 0, 0, 255]));
        let b = RgbaImage::from_pixel(4, 4, Rgba([10, 255, 255, 0]));
        assert_eq!(motion_score(&a, &b), 0.0);
    }

    #[test]
    fn test_size_change_counts_as_motion() {
        let small = RgbaImage::new(2, 2);
        assert_eq!(motion_score(&small, &flat(0)), 1.0);
    }

    #[test]
    fn test_first_frame_only_primes() {
        let mut detector = StabilityDetector::default();
        assert!(detector.observe(flat(0)).is_none());
        assert_eq!(detector.stable_count(), 0);
        assert!(detector.state().previous.is_some());
    }

    #[test]
    fn test_identical_frames_emit_exactly_once() {
        let mut detector = StabilityDetector::new(StabilityConfig::default());
        detector.observe(flat(40));

        let emissions = (0..5).filter_map(|_| detector.observe(flat(40))).count();
        assert_eq!(emissions, 1);

        // still scene keeps counting but never re-emits
        let later = (0..20).filter_map(|_| detector.observe(flat(40))).count();
        assert_eq!(later, 0);
    }

    #[test]
    fn test_constant_motion_never_emits() {
        let mut detector = StabilityDetector::default();
        detector.observe(flat(0));
        for i in 1..50u32 {
            // alternating frames differ by 0.2 of full range
            let red = if i % 2 == 0 { 0 } else { 51 };
            assert!(detector.observe(flat(red)).is_none());
            assert_eq!(detector.stable_count(), 0);
        }
    }

    #[test]
    fn test_movement_restarts_run() {
        let mut detector = StabilityDetector::default();
        detector.observe(flat(0));
        for _ in 0..4 {
            assert!(detector.observe(flat(0)).is_none());
        }
        assert!(detector.observe(flat(200)).is_none());
        assert_eq!(detector.stable_count(), 0);

        let emissions = (0..5).filter_map(|_| detector.observe(flat(200))).count();
        assert_eq!(emissions, 1);
    }

    #[test]
    fn test_score_at_threshold_counts_as_motion() {
        let dark = RgbaImage::from_pixel(51, 1, Rgba([0, 0, 0, 255]));
        let lit = RgbaImage::from_pixel(51, 1, Rgba([1, 0, 0, 255]));
        let config = StabilityConfig {
            movement_threshold: motion_score(&dark, &lit),
            stable_frame_threshold: 1,
        };
        assert!((config.movement_threshold - 1.0 / 255.0).abs() < 1e-12);

        let mut detector = StabilityDetector::new(config);
        detector.observe(dark.clone());
        for i in 0..10 {
            let frame = if i % 2 == 0 { lit.clone() } else { dark.clone() };
            assert!(detector.observe(frame).is_none());
            assert_eq!(detector.stable_count(), 0);
        }
    }

    #[test]
    fn test_zero_frame_threshold_rejected() {
        let config = StabilityConfig {
            stable_frame_threshold: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(StabilityConfig::default().validate().is_ok());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut detector = StabilityDetector::default();
        detector.observe(flat(0));
        detector.observe(flat(0));
        detector.reset();
        assert_eq!(detector.stable_count(), 0);
        assert!(detector.state().previous.is_none());
    }
}
