//! Display surface: live preview, result overlay and scoreboard

use anyhow::{Context, Result};
use image::{RgbImage, RgbaImage};
use opencv::{
    core::{Mat, Point, Scalar},
    highgui,
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_AA},
    prelude::*,
};
use roshambo_core::{MatchLedger, Tally};
use roshambo_cv::utils::ImageUtils;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const HISTORY_LINES: usize = 5;

/// Whether the live video sits above or beneath the result overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoLayer {
    Front,
    Behind,
}

/// Summary of the session so far, as shown to the player
#[derive(Debug, Clone, PartialEq)]
pub struct Scoreboard {
    pub win_rate: f64,
    pub tally: Tally,
    pub history: Vec<String>,
}

impl Scoreboard {
    pub fn from_ledger<I>(ledger: &MatchLedger<I>) -> Self {
        let history = ledger
            .rounds()
            .iter()
            .map(|round| {
                format!(
                    "#{} you: {} / machine: {} -> {}",
                    round.index() + 1,
                    round.player_move(),
                    round.computer_move(),
                    round.player_outcome(),
                )
            })
            .collect();

        Self {
            win_rate: ledger.win_rate(),
            tally: ledger.tally(),
            history,
        }
    }

    pub fn headline(&self) -> String {
        format!(
            "Win rate {:.1}%  (W {} / D {} / L {})",
            self.win_rate, self.tally.wins, self.tally.draws, self.tally.losses
        )
    }
}

/// Write-only rendering target
pub trait DisplaySurface {
    fn show_preview(&mut self, frame: &RgbaImage) -> Result<()>;
    fn show_result(&mut self, annotated: &RgbImage) -> Result<()>;
    fn set_video_layer(&mut self, layer: VideoLayer) -> Result<()>;
    fn show_scoreboard(&mut self, board: &Scoreboard) -> Result<()>;
    fn show_status(&mut self, message: &str) -> Result<()>;
}

/// A single OpenCV HighGUI window
pub struct HighGuiDisplay {
    window: String,
    layer: VideoLayer,
    result: Option<Mat>,
    board: Option<Scoreboard>,
    status: Option<String>,
    clicked: Arc<AtomicBool>,
}

impl HighGuiDisplay {
    pub fn new(window: &str) -> Result<Self> {
        highgui::named_window(window, highgui::WINDOW_AUTOSIZE)
            .with_context(|| format!("Failed to create window: {}", window))?;

        let clicked = Arc::new(AtomicBool::new(false));
        let flag = clicked.clone();
        highgui::set_mouse_callback(
            window,
            Some(Box::new(move |event, _x, _y, _flags| {
                if event == highgui::EVENT_LBUTTONDOWN {
                    flag.store(true, Ordering::SeqCst);
                }
            })),
        )?;

        Ok(Self {
            window: window.to_string(),
            layer: VideoLayer::Front,
            result: None,
            board: None,
            status: None,
            clicked,
        })
    }

    /// True if the window was clicked since the last call
    pub fn take_click(&self) -> bool {
        self.clicked.swap(false, Ordering::SeqCst)
    }

    /// Pump HighGUI events, returning the pressed key if any
    pub fn poll_key(&self, delay_ms: i32) -> Result<Option<i32>> {
        let key = highgui::wait_key(delay_ms)?;
        Ok((key >= 0).then_some(key & 0xff))
    }

    fn present(&self, mut canvas: Mat) -> Result<()> {
        self.draw_text(&mut canvas)?;
        highgui::imshow(&self.window, &canvas)?;
        Ok(())
    }

    fn draw_text(&self, canvas: &mut Mat) -> Result<()> {
        let mut lines = Vec::new();
        if let Some(status) = &self.status {
            lines.push(status.clone());
        }
        if let Some(board) = &self.board {
            lines.push(board.headline());
            let skip = board.history.len().saturating_sub(HISTORY_LINES);
            lines.extend(board.history.iter().skip(skip).cloned());
        }

        for (i, line) in lines.iter().enumerate() {
            imgproc::put_text(
                canvas,
                line,
                Point::new(10, 24 + 22 * i as i32),
                FONT_HERSHEY_SIMPLEX,
                0.6,
                Scalar::new(255.0, 255.0, 255.0, 255.0),
                2,
                LINE_AA,
                false,
            )?;
        }
        Ok(())
    }

    fn redraw_result(&self) -> Result<()> {
        if let Some(result) = &self.result {
            self.present(result.try_clone()?)?;
        }
        Ok(())
    }
}

impl DisplaySurface for HighGuiDisplay {
    fn show_preview(&mut self, frame: &RgbaImage) -> Result<()> {
        if self.layer == VideoLayer::Behind {
            return Ok(());
        }
        let bgr = ImageUtils::rgb_to_bgr_mat(&ImageUtils::rgba_to_rgb(frame))?;
        self.present(bgr)
    }

    fn show_result(&mut self, annotated: &RgbImage) -> Result<()> {
        self.result = Some(ImageUtils::rgb_to_bgr_mat(annotated)?);
        if self.layer == VideoLayer::Behind {
            self.redraw_result()?;
        }
        Ok(())
    }

    fn set_video_layer(&mut self, layer: VideoLayer) -> Result<()> {
        self.layer = layer;
        match layer {
            VideoLayer::Behind => self.redraw_result(),
            VideoLayer::Front => {
                self.result = None;
                Ok(())
            }
        }
    }

    fn show_scoreboard(&mut self, board: &Scoreboard) -> Result<()> {
        self.board = Some(board.clone());
        if self.layer == VideoLayer::Behind {
            self.redraw_result()?;
        }
        Ok(())
    }

    fn show_status(&mut self, message: &str) -> Result<()> {
        self.status = Some(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roshambo_core::Gesture::*;

    #[test]
    fn test_scoreboard_from_ledger() {
        let mut ledger = MatchLedger::new();
        ledger.append_round(Rock, Paper, ());
        ledger.append_round(Scissors, Paper, ());

        let board = Scoreboard::from_ledger(&ledger);
        assert_eq!(board.history.len(), 2);
        assert_eq!(board.history[0], "#1 you: rock / machine: paper -> loss");
        assert_eq!(board.history[1], "#2 you: scissors / machine: paper -> win");
        assert_eq!(board.headline(), "Win rate 50.0%  (W 1 / D 0 / L 1)");
    }
}
