//! Interaction controller: sampling → stability → detection → scoring
//!
//! All session state lives in [`InteractionController`] and is only touched
//! from its own methods, called from a single event loop. A pipeline run
//! blocks that loop, so at most one round is ever in flight.

use crate::display::{DisplaySurface, Scoreboard, VideoLayer};
use crate::timer::SamplingTimer;
use anyhow::Result;
use image::{RgbImage, RgbaImage};
use roshambo_core::{MatchLedger, OpponentStrategy};
use roshambo_cv::traits::{FrameSource, InferenceBackend};
use roshambo_cv::utils::ImageUtils;
use roshambo_cv::{
    Detection, DetectionConfig, DetectionPipeline, FrameSampler, StabilityConfig, StabilityDetector,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Capturing,
    PausedOnDetection,
}

/// What a single call into the controller did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Nothing to do: not capturing, timer not due, or source not ready
    Skipped,
    /// The camera failed to deliver a frame; capture continues
    SourceFailed,
    /// A snapshot was taken but the scene isn't stable yet
    Sampled,
    /// A stable frame was checked and held no gesture
    NoDetection,
    /// The pipeline failed; the round was dropped
    PipelineFailed,
    /// A round was recorded and capture paused
    RoundRecorded { index: usize },
    /// A detection arrived outside of capture and was dropped
    Ignored,
}

pub struct InteractionController<S, B, D> {
    state: InteractionState,
    source: Option<S>,
    sampler: FrameSampler,
    stability: StabilityDetector,
    pipeline: DetectionPipeline<B>,
    strategy: OpponentStrategy,
    ledger: MatchLedger<RgbaImage>,
    timer: SamplingTimer,
    display: D,
}

impl<S, B, D> InteractionController<S, B, D>
where
    S: FrameSource,
    B: InferenceBackend,
    D: DisplaySurface,
{
    pub fn new(
        stability: StabilityConfig,
        detection: DetectionConfig,
        capture_interval: Duration,
        backend: B,
        display: D,
    ) -> Self {
        Self {
            state: InteractionState::Idle,
            source: None,
            sampler: FrameSampler::new(),
            stability: StabilityDetector::new(stability),
            pipeline: DetectionPipeline::new(detection, backend),
            strategy: OpponentStrategy::new(),
            ledger: MatchLedger::new(),
            timer: SamplingTimer::new(capture_interval),
            display,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn ledger(&self) -> &MatchLedger<RgbaImage> {
        &self.ledger
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn timer(&self) -> &SamplingTimer {
        &self.timer
    }

    pub fn stability(&self) -> &StabilityDetector {
        &self.stability
    }

    /// Idle → Capturing once `acquire` yields a camera.
    ///
    /// On failure the error is reported and the controller stays idle so the
    /// user can try again. A no-op when not idle.
    pub fn start<F>(&mut self, acquire: F, now: Instant) -> Result<()>
    where
        F: FnOnce() -> Result<S>,
    {
        if self.state != InteractionState::Idle {
            return Ok(());
        }

        match acquire() {
            Ok(source) => {
                self.source = Some(source);
                self.stability.reset();
                self.timer.start(now);
                self.state = InteractionState::Capturing;
                warn_on_display_error(self.display.show_status("Hold your gesture still"));
                log::info!("Capture started");
                Ok(())
            }
            Err(e) => {
                log::error!("Error accessing webcam: {:#}", e);
                warn_on_display_error(self.display.show_status("Camera unavailable - press S to retry"));
                Err(e)
            }
        }
    }

    /// Called from the event loop; samples when the timer is due
    pub fn tick(&mut self, now: Instant) -> Result<Step> {
        if self.state != InteractionState::Capturing || !self.timer.poll(now) {
            return Ok(Step::Skipped);
        }

        let Some(source) = self.source.as_mut() else {
            return Ok(Step::Skipped);
        };

        let frame = match self.sampler.sample(source) {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(Step::Skipped),
            Err(e) => {
                log::warn!("Failed to read camera frame: {:#}", e);
                return Ok(Step::SourceFailed);
            }
        };

        warn_on_display_error(self.display.show_preview(&frame));

        match self.stability.observe(frame) {
            Some(stable) => self.run_detection(stable),
            None => Ok(Step::Sampled),
        }
    }

    fn run_detection(&mut self, stable: RgbaImage) -> Result<Step> {
        let encoded = match ImageUtils::encode_jpeg(&stable) {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("Failed to encode stable frame, dropping round: {:#}", e);
                self.stability.reset();
                return Ok(Step::PipelineFailed);
            }
        };

        let outcome = match self.pipeline.run(&encoded) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("Detection failed, dropping round: {}", e);
                self.stability.reset();
                return Ok(Step::PipelineFailed);
            }
        };

        log::debug!("Pipeline finished in {}ms", outcome.processing_time_ms);

        match outcome.detection {
            Some(detection) => self.on_detection(detection, &stable, &outcome.annotated),
            None => {
                log::debug!("No gesture above threshold");
                self.stability.reset();
                Ok(Step::NoDetection)
            }
        }
    }

    /// Capturing → PausedOnDetection, recording the round.
    ///
    /// Ignored unless capturing, so one stable frame can't score twice and
    /// nothing scores before the camera is started.
    pub fn on_detection(
        &mut self,
        detection: Detection,
        frame: &RgbaImage,
        annotated: &RgbImage,
    ) -> Result<Step> {
        if self.state != InteractionState::Capturing {
            log::debug!("Ignoring {} detection in state {:?}", detection.label, self.state);
            return Ok(Step::Ignored);
        }

        self.state = InteractionState::PausedOnDetection;
        self.timer.stop();

        let computer = self.strategy.next_move(&self.ledger);
        let captured = ImageUtils::crop(frame, &detection.region);
        let round = self.ledger.append_round(detection.label, computer, captured);
        let index = round.index();

        log::info!(
            "Round {}: player {} vs computer {} -> {}",
            index + 1,
            round.player_move(),
            round.computer_move(),
            round.player_outcome()
        );

        // the round is already recorded; a display hiccup must not lose it
        warn_on_display_error(self.display.show_result(annotated));
        warn_on_display_error(self.display.set_video_layer(VideoLayer::Behind));
        warn_on_display_error(self.display.show_scoreboard(&Scoreboard::from_ledger(&self.ledger)));
        warn_on_display_error(self.display.show_status("Click or press Space to play again"));

        Ok(Step::RoundRecorded { index })
    }

    /// PausedOnDetection → Capturing; a no-op in any other state
    pub fn resume(&mut self, now: Instant) -> Result<bool> {
        if self.state != InteractionState::PausedOnDetection {
            return Ok(false);
        }

        self.stability.reset();
        warn_on_display_error(self.display.set_video_layer(VideoLayer::Front));
        warn_on_display_error(self.display.show_status("Hold your gesture still"));
        self.timer.start(now);
        self.state = InteractionState::Capturing;
        log::info!("Capture resumed");
        Ok(true)
    }
}

fn warn_on_display_error(result: Result<()>) {
    if let Err(e) = result {
        log::warn!("Display update failed: {:#}", e);
    }
}
