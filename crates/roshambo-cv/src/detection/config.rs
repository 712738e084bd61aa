//! Detection configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub model_path: PathBuf,
    pub preprocess_model_path: PathBuf,
    pub input_shape: ModelInputShape,
    pub score_threshold: f32,
    pub visualization: VisualizationConfig,
}

/// Fixed NCHW input contract of the detector network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInputShape {
    pub batch: u32,
    pub channels: u32,
    pub height: u32,
    pub width: u32,
}

impl ModelInputShape {
    /// `[batch, channels, height, width]`
    pub fn dims(&self) -> [usize; 4] {
        [
            self.batch as usize,
            self.channels as usize,
            self.height as usize,
            self.width as usize,
        ]
    }
}

impl Default for ModelInputShape {
    fn default() -> Self {
        Self {
            batch: 1,
            channels: 3,
            height: 640,
            width: 640,
        }
    }
}

/// Visualization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationConfig {
    pub draw_bboxes: bool,
    pub draw_labels: bool,
    pub draw_confidence: bool,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            draw_bboxes: true,
            draw_labels: true,
            draw_confidence: true,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            model_path: "model/rps.onnx".into(),
            preprocess_model_path: "model/preprocess-yolo.onnx".into(),
            input_shape: ModelInputShape::default(),
            score_threshold: 0.75,
            visualization: VisualizationConfig::default(),
        }
    }
}

impl DetectionConfig {
    /// No overlay on the result image
    pub fn headless() -> Self {
        Self {
            visualization: VisualizationConfig {
                draw_bboxes: false,
                draw_labels: false,
                draw_confidence: false,
            },
            ..Default::default()
        }
    }
}
