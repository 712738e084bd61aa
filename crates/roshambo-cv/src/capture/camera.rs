use crate::traits::FrameSource;
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::{bail, Context};
use image::RgbaImage;
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, CAP_ANY},
};

/// Webcam opened through OpenCV videoio
pub struct CameraSource {
    capture: VideoCapture,
    frame: Mat,
}

impl CameraSource {
    pub fn open(index: i32) -> Result<Self> {
        log::info!("Opening camera {}", index);

        let capture = VideoCapture::new(index, CAP_ANY)
            .with_context(|| format!("Failed to open camera {}", index))?;

        if !capture.is_opened()? {
            bail!("Camera {} is not available (missing device or permission denied)", index);
        }

        log::info!("Camera opened successfully");
        Ok(Self {
            capture,
            frame: Mat::default(),
        })
    }
}

impl FrameSource for CameraSource {
    fn dimensions(&self) -> Option<(u32, u32)> {
        let width = self.capture.get(videoio::CAP_PROP_FRAME_WIDTH).ok()?;
        let height = self.capture.get(videoio::CAP_PROP_FRAME_HEIGHT).ok()?;
        if width < 1.0 || height < 1.0 {
            return None;
        }
        Some((width as u32, height as u32))
    }

    fn read_frame(&mut self) -> Result<Option<RgbaImage>> {
        if !self.capture.read(&mut self.frame)? || self.frame.empty() {
            return Ok(None);
        }

        ImageUtils::bgr_to_rgba(&self.frame).map(Some)
    }
}
