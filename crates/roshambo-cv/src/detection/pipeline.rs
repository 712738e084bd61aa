//! Single-shot gesture detection: decode, letterbox, two networks, one box

use super::config::DetectionConfig;
use super::decode::{first_match, DetectionRow};
use super::error::PipelineError;
use super::letterbox::Letterbox;
use crate::bbox::Detection;
use crate::traits::InferenceBackend;
use crate::utils::{render, ImageUtils};
use image::RgbImage;
use std::time::Instant;

/// Everything one pipeline run produces
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The decoded candidate image
    pub image: RgbImage,
    /// `image` with the detection overlay, or a copy of it when nothing was found
    pub annotated: RgbImage,
    pub detection: Option<Detection>,
    pub processing_time_ms: u64,
}

pub struct DetectionPipeline<B> {
    config: DetectionConfig,
    backend: B,
}

impl<B: InferenceBackend> DetectionPipeline<B> {
    pub fn new(config: DetectionConfig, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run detection on an encoded candidate image.
    ///
    /// Any error leaves no trace beyond the returned value.
    pub fn run(&mut self, encoded: &[u8]) -> Result<PipelineOutcome, PipelineError> {
        let start_time = Instant::now();

        let decoded = ImageUtils::decode_tensor(encoded)?;
        let tensor = &decoded.pixels;
        let letterbox = Letterbox::compute(tensor.width, tensor.height, &self.config.input_shape);

        let prepared = self
            .backend
            .preprocess(&decoded.prep_input(), letterbox.padding(), letterbox.scales())
            .map_err(|cause| PipelineError::Inference {
                stage: "preprocessing",
                cause,
            })?;

        let expected = self.config.input_shape.dims();
        if prepared.shape.as_slice() != expected.as_slice() {
            return Err(PipelineError::OutputShape {
                expected: format!("{:?}", expected),
                actual: prepared.shape,
            });
        }

        let output = self
            .backend
            .detect(&prepared)
            .map_err(|cause| PipelineError::Inference {
                stage: "detector",
                cause,
            })?;

        let rows = DetectionRow::parse(&output)?;
        log::debug!("Detector returned {} rows", rows.len());

        let detection = first_match(&rows, self.config.score_threshold)
            .map(|row| row.decode(&letterbox))
            .transpose()?;

        let image = tensor.to_rgb_image();
        let annotated = match &detection {
            Some(found) if self.config.visualization.draw_bboxes => {
                render::draw_detection(&image, found, &self.config.visualization).unwrap_or_else(|e| {
                    log::warn!("Failed to draw detection overlay: {:#}", e);
                    image.clone()
                })
            }
            _ => image.clone(),
        };

        Ok(PipelineOutcome {
            image,
            annotated,
            detection,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{PrepInput, Tensor};
    use crate::Result;
    use anyhow::anyhow;
    use image::{Rgba, RgbaImage};
    use roshambo_core::Gesture;

    /// Backend returning canned rows and recording what it was given
    struct ScriptedBackend {
        rows: Vec<f32>,
        fail_detect: bool,
        seen_padding: Option<[i64; 4]>,
        seen_scales: Option<[f32; 2]>,
        seen_input: Option<PrepInput>,
    }

    impl ScriptedBackend {
        fn with_rows(rows: Vec<f32>) -> Self {
            Self {
                rows,
                fail_detect: false,
                seen_padding: None,
                seen_scales: None,
                seen_input: None,
            }
        }
    }

    impl InferenceBackend for ScriptedBackend {
        fn preprocess(&mut self, input: &PrepInput, padding: [i64; 4], scales: [f32; 2]) -> Result<Tensor> {
            self.seen_input = Some(input.clone());
            self.seen_padding = Some(padding);
            self.seen_scales = Some(scales);
            Ok(Tensor::zeros(&[1, 3, 640, 640]))
        }

        fn detect(&mut self, _input: &Tensor) -> Result<Tensor> {
            if self.fail_detect {
                return Err(anyhow!("runtime unavailable"));
            }
            let n = self.rows.len() / 6;
            Ok(Tensor::new(vec![1, n, 6], self.rows.clone()))
        }
    }

    fn encoded_frame(width: u32, height: u32) -> Vec<u8> {
        let frame = RgbaImage::from_pixel(width, height, Rgba([90, 120, 150, 255]));
        ImageUtils::encode_jpeg(&frame).unwrap()
    }

    fn pipeline(backend: ScriptedBackend) -> DetectionPipeline<ScriptedBackend> {
        DetectionPipeline::new(DetectionConfig::headless(), backend)
    }

    #[test]
    fn test_single_detection_decoded() -> Result<()> {
        let rows = vec![
            64.0, 80.0, 192.0, 320.0, 0.9, 1.0, //
            0.0, 0.0, 10.0, 10.0, 0.8, 2.0,
        ];
        let mut pipeline = pipeline(ScriptedBackend::with_rows(rows));
        let outcome = pipeline.run(&encoded_frame(320, 240))?;

        // M = 320, top padding 40, scale 2.0
        assert_eq!(pipeline.backend().seen_padding, Some([40, 0, 40, 0]));
        assert_eq!(pipeline.backend().seen_scales, Some([2.0, 2.0]));

        let detection = outcome.detection.expect("one detection");
        assert_eq!(detection.label, Gesture::Paper);
        assert!((detection.region.x - 32.0).abs() < 1e-4);
        assert!((detection.region.y - 0.0).abs() < 1e-4);
        assert!((detection.region.width - 64.0).abs() < 1e-4);
        assert!((detection.region.height - 120.0).abs() < 1e-4);
        assert_eq!(outcome.image.dimensions(), (320, 240));
        Ok(())
    }

    #[test]
    fn test_decoded_frame_sent_as_planar_floats() -> Result<()> {
        let mut pipeline = pipeline(ScriptedBackend::with_rows(Vec::new()));
        pipeline.run(&encoded_frame(40, 30))?;

        let Some(PrepInput::Planar(input)) = &pipeline.backend().seen_input else {
            panic!("expected planar input, got {:?}", pipeline.backend().seen_input);
        };
        assert_eq!(input.shape, vec![1, 3, 30, 40]);
        assert!(input.data.iter().all(|v| (0.0..=1.0).contains(v)));

        // flat colour survives JPEG closely; red plane first
        let red = input.data[0] * 255.0;
        let blue = input.data[2 * 30 * 40] * 255.0;
        assert!((red - 90.0).abs() < 6.0, "red {}", red);
        assert!((blue - 150.0).abs() < 6.0, "blue {}", blue);
        Ok(())
    }

    #[test]
    fn test_low_confidence_reports_nothing() -> Result<()> {
        let rows = vec![0.0, 0.0, 50.0, 50.0, 0.4, 0.0];
        let mut pipeline = pipeline(ScriptedBackend::with_rows(rows));
        let outcome = pipeline.run(&encoded_frame(64, 64))?;
        assert!(outcome.detection.is_none());
        Ok(())
    }

    #[test]
    fn test_inference_failure_propagates() {
        let mut backend = ScriptedBackend::with_rows(Vec::new());
        backend.fail_detect = true;
        let mut pipeline = pipeline(backend);

        let err = pipeline.run(&encoded_frame(64, 64)).unwrap_err();
        assert!(matches!(err, PipelineError::Inference { stage: "detector", .. }));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let mut pipeline = pipeline(ScriptedBackend::with_rows(Vec::new()));
        let err = pipeline.run(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }
}
