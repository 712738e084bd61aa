//! Detection regions in source-image coordinates

use opencv::core::Rect;
use roshambo_core::Gesture;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in source-image pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Integer pixel bounds clipped to a `width` x `height` image.
    ///
    /// Returns `(x, y, w, h)`, or `None` when nothing of the region is inside.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x.floor().clamp(0.0, width as f32) as u32;
        let y0 = self.y.floor().clamp(0.0, height as f32) as u32;
        let x1 = (self.x + self.width).ceil().clamp(0.0, width as f32) as u32;
        let y1 = (self.y + self.height).ceil().clamp(0.0, height as f32) as u32;

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some((x0, y0, x1 - x0, y1 - y0))
    }

    /// Convert to OpenCV Rect
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.x.round() as i32,
            self.y.round() as i32,
            self.width.round() as i32,
            self.height.round() as i32,
        )
    }
}

/// The one gesture kept from a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub region: Region,
    pub label: Gesture,
    pub confidence: f32,
}

impl Detection {
    pub fn caption(&self, with_confidence: bool) -> String {
        if with_confidence {
            format!("{} ({:.2})", self.label, self.confidence)
        } else {
            self.label.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside() {
        let region = Region::new(10.2, 20.0, 30.5, 40.0);
        assert_eq!(region.clamp_to(640, 480), Some((10, 20, 31, 40)));
    }

    #[test]
    fn test_clamp_partially_outside() {
        // letterbox decoding can push boxes past the left edge
        let region = Region::new(-15.0, 5.0, 40.0, 500.0);
        assert_eq!(region.clamp_to(100, 100), Some((0, 5, 25, 95)));
    }

    #[test]
    fn test_clamp_fully_outside() {
        let region = Region::new(120.0, 0.0, 10.0, 10.0);
        assert_eq!(region.clamp_to(100, 100), None);
        assert_eq!(Region::new(0.0, 0.0, 0.0, 10.0).clamp_to(100, 100), None);
    }

    #[test]
    fn test_caption() {
        let detection = Detection {
            region: Region::new(0.0, 0.0, 1.0, 1.0),
            label: Gesture::Scissors,
            confidence: 0.876,
        };
        assert_eq!(detection.caption(true), "scissors (0.88)");
        assert_eq!(detection.caption(false), "scissors");
    }
}
