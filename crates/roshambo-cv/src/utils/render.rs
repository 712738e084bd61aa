//! Box and caption overlay for the result view

use super::image::ImageUtils;
use crate::bbox::Detection;
use crate::detection::VisualizationConfig;
use crate::Result;
use image::RgbImage;
use opencv::{
    core::{Point, Scalar},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
};

/// Colour scalar in the channel order of a Mat built from an RgbImage
fn rgb_scalar((r, g, b): (u8, u8, u8)) -> Scalar {
    Scalar::new(r as f64, g as f64, b as f64, 255.0)
}

/// Draw the detection box and its caption onto a copy of `image`
pub fn draw_detection(
    image: &RgbImage,
    detection: &Detection,
    visualization: &VisualizationConfig,
) -> Result<RgbImage> {
    let mut output = ImageUtils::rgb_to_mat(image)?;
    let color = rgb_scalar(detection.label.color());
    let rect = detection.region.to_rect();

    if visualization.draw_bboxes {
        imgproc::rectangle(&mut output, rect, color, 3, LINE_8, 0)?;
    }

    if visualization.draw_labels {
        let label = detection.caption(visualization.draw_confidence);
        // keep the caption on screen when the box touches the top edge
        let baseline_y = (rect.y - 8).max(20);

        imgproc::put_text(
            &mut output,
            &label,
            Point::new(rect.x.max(0) + 5, baseline_y),
            FONT_HERSHEY_SIMPLEX,
            0.8,
            color,
            2,
            LINE_8,
            false,
        )?;
    }

    ImageUtils::mat_to_rgb(&output)
}
