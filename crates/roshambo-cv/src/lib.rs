//! Roshambo Computer Vision Library
//!
//! Camera sampling, motion-based stability detection and the single-shot
//! gesture detection pipeline built on OpenCV.

pub mod backend;
pub mod bbox;
pub mod capture;
pub mod detection;
pub mod motion;
pub mod utils;

// Re-export commonly used types
pub use backend::{DecodedImage, ImageTensor, OnnxBackend, PrepInput, Tensor};
pub use bbox::{Detection, Region};
pub use capture::{CameraSource, FrameSampler};
pub use detection::{DetectionConfig, DetectionPipeline, PipelineError, PipelineOutcome};
pub use motion::{StabilityConfig, StabilityDetector};

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the CV system
pub mod traits {
    use super::*;
    use image::RgbaImage;

    /// A live pixel source such as a webcam
    pub trait FrameSource {
        /// Current frame size, `None` until the stream has produced metadata
        fn dimensions(&self) -> Option<(u32, u32)>;

        /// Grab the current frame as RGBA, `None` if nothing was available
        fn read_frame(&mut self) -> Result<Option<RgbaImage>>;
    }

    /// The two pretrained networks the detection pipeline runs in sequence
    pub trait InferenceBackend {
        /// Pad and resize `input` into the detector input.
        ///
        /// `padding` is `[top, left, bottom, right]`, `scales` is `[height, width]`.
        fn preprocess(&mut self, input: &PrepInput, padding: [i64; 4], scales: [f32; 2]) -> Result<Tensor>;

        /// Run the detector, returning rows of
        /// `[left, top, right, bottom, confidence, class_id]` sorted by confidence
        fn detect(&mut self, input: &Tensor) -> Result<Tensor>;
    }
}
