//! High-level detection module

pub mod config;
pub mod decode;
pub mod error;
pub mod letterbox;
pub mod pipeline;

pub use config::{DetectionConfig, ModelInputShape, VisualizationConfig};
pub use decode::{first_match, DetectionRow};
pub use error::PipelineError;
pub use letterbox::Letterbox;
pub use pipeline::{DetectionPipeline, PipelineOutcome};
