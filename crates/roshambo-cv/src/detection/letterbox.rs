//! Square padding and scale factors for the fixed-size model input

use super::config::ModelInputShape;
use crate::bbox::Region;

/// Padding that makes an image square, plus the resize factors to the model size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub pad_top: u32,
    pub pad_left: u32,
    pub pad_bottom: u32,
    pub pad_right: u32,
    pub scale_h: f32,
    pub scale_w: f32,
}

impl Letterbox {
    /// Pad the shorter side up to the longer one, odd remainders go to the
    /// trailing edge
    pub fn compute(width: u32, height: u32, shape: &ModelInputShape) -> Self {
        let side = width.max(height);
        let pad_w = side - width;
        let pad_h = side - height;

        let pad_left = pad_w / 2;
        let pad_top = pad_h / 2;

        Self {
            pad_top,
            pad_left,
            pad_bottom: pad_h - pad_top,
            pad_right: pad_w - pad_left,
            scale_h: shape.height as f32 / side as f32,
            scale_w: shape.width as f32 / side as f32,
        }
    }

    /// `[top, left, bottom, right]`
    pub fn padding(&self) -> [i64; 4] {
        [
            self.pad_top as i64,
            self.pad_left as i64,
            self.pad_bottom as i64,
            self.pad_right as i64,
        ]
    }

    /// `[height, width]`
    pub fn scales(&self) -> [f32; 2] {
        [self.scale_h, self.scale_w]
    }

    /// Map model-space corners back to source-image pixels.
    ///
    /// The padding offset is subtracted after unscaling.
    pub fn to_source(&self, left: f32, top: f32, right: f32, bottom: f32) -> Region {
        Region::new(
            left / self.scale_w - self.pad_left as f32,
            top / self.scale_h - self.pad_top as f32,
            (right - left) / self.scale_w,
            (bottom - top) / self.scale_h,
        )
    }
}
