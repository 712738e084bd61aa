use crate::traits::FrameSource;
use crate::utils::ImageUtils;
use crate::Result;
use image::RgbaImage;

/// Takes mirrored snapshots from a live source
#[derive(Debug, Clone, Copy)]
pub struct FrameSampler {
    mirror: bool,
}

impl FrameSampler {
    pub fn new() -> Self {
        Self { mirror: true }
    }

    /// Sampler that keeps the camera's own orientation
    pub fn unmirrored() -> Self {
        Self { mirror: false }
    }

    /// Grab one snapshot, or `None` while the source has no usable size
    pub fn sample<S: FrameSource + ?Sized>(&self, source: &mut S) -> Result<Option<RgbaImage>> {
        match source.dimensions() {
            Some((w, h)) if w > 0 && h > 0 => {}
            _ => return Ok(None),
        }

        let Some(frame) = source.read_frame()? else {
            return Ok(None);
        };

        Ok(Some(if self.mirror {
            ImageUtils::mirror(&frame)
        } else {
            frame
        }))
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new()
    }
}
