//! Live frame capture

pub mod camera;
pub mod sampler;

pub use crate::traits::FrameSource;
pub use camera::CameraSource;
pub use sampler::FrameSampler;
