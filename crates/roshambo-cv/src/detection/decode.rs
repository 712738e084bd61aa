//! Detector output rows and the first-match scan over them

use super::error::PipelineError;
use super::letterbox::Letterbox;
use crate::backend::Tensor;
use crate::bbox::Detection;
use roshambo_core::Gesture;

pub const ROW_WIDTH: usize = 6;

/// One candidate box in model-input coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionRow {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub confidence: f32,
    pub class_id: f32,
}

impl DetectionRow {
    pub fn from_slice(row: &[f32]) -> Option<Self> {
        match *row {
            [left, top, right, bottom, confidence, class_id] => Some(Self {
                left,
                top,
                right,
                bottom,
                confidence,
                class_id,
            }),
            _ => None,
        }
    }

    /// Split a `[1, N, 6]` or `[N, 6]` output into rows
    pub fn parse(output: &Tensor) -> Result<Vec<Self>, PipelineError> {
        let width_ok = output.shape.last() == Some(&ROW_WIDTH);
        if !width_ok || output.data.len() % ROW_WIDTH != 0 {
            return Err(PipelineError::OutputShape {
                expected: format!("[1, N, {ROW_WIDTH}]"),
                actual: output.shape.clone(),
            });
        }

        Ok(output
            .data
            .chunks_exact(ROW_WIDTH)
            .filter_map(Self::from_slice)
            .collect())
    }

    pub fn decode(&self, letterbox: &Letterbox) -> Result<Detection, PipelineError> {
        let label = Gesture::from_class_id(self.class_id.round() as i64)?;
        Ok(Detection {
            region: letterbox.to_source(self.left, self.top, self.right, self.bottom),
            label,
            confidence: self.confidence,
        })
    }
}

/// First row clearing `threshold`, or none.
///
/// Rows arrive sorted by descending confidence, so the scan ends at the first
/// row below the threshold and at most one row is ever returned.
pub fn first_match(rows: &[DetectionRow], threshold: f32) -> Option<&DetectionRow> {
    let sorted = rows.windows(2).all(|w| w[0].confidence >= w[1].confidence);
    debug_assert!(sorted, "detector rows must be sorted by confidence");
    if !sorted {
        log::warn!("Detector rows are not sorted by confidence; using the first row only");
    }

    rows.iter().take_while(|row| row.confidence >= threshold).next()
}
