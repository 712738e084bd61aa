use anyhow::Result;
use clap::Parser;
use roshambo::{AppConfig, HighGuiDisplay, InteractionController, InteractionState};
use roshambo_cv::{CameraSource, OnnxBackend};
use std::path::PathBuf;
use std::time::Instant;

const KEY_ESC: i32 = 27;
const KEY_ENTER: i32 = 13;
const KEY_SPACE: i32 = 32;

#[derive(Parser, Debug)]
#[command(name = "roshambo", about = "Rock paper scissors against your webcam")]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Camera device index
    #[arg(long)]
    camera: Option<i32>,

    /// Detector ONNX model
    #[arg(long)]
    model: Option<PathBuf>,

    /// Preprocessing ONNX model
    #[arg(long)]
    preprocess_model: Option<PathBuf>,

    /// Minimum detection confidence
    #[arg(long)]
    score_threshold: Option<f32>,

    /// Sampling period in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Open the camera immediately instead of waiting for S
    #[arg(long)]
    autostart: bool,
}

impl Args {
    fn into_config(self) -> Result<(AppConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(camera) = self.camera {
            config.camera_index = camera;
        }
        if let Some(model) = self.model {
            config.detection.model_path = model;
        }
        if let Some(prep) = self.preprocess_model {
            config.detection.preprocess_model_path = prep;
        }
        if let Some(threshold) = self.score_threshold {
            config.detection.score_threshold = threshold;
        }
        if let Some(interval) = self.interval_ms {
            config.capture_interval_ms = interval;
        }

        Ok((config, self.autostart))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config, autostart) = Args::parse().into_config()?;
    log::info!("Starting roshambo");

    let mut backend = OnnxBackend::load(&config.detection)?;
    backend.warm_up()?;

    let display = HighGuiDisplay::new(&config.window_title)?;
    let camera_index = config.camera_index;
    let mut controller: InteractionController<CameraSource, _, _> = InteractionController::new(
        config.stability.clone(),
        config.detection.clone(),
        config.capture_interval(),
        backend,
        display,
    );

    let open_camera = || CameraSource::open(camera_index);

    if autostart {
        // failure is logged and shown; the user can retry with S
        let _ = controller.start(open_camera, Instant::now());
    }

    loop {
        let key = controller.display().poll_key(1)?;
        let clicked = controller.display().take_click();

        match key {
            Some(k) if k == i32::from(b'q') || k == KEY_ESC => break,
            Some(k) if k == i32::from(b's') || k == KEY_ENTER => {
                if controller.state() == InteractionState::Idle {
                    let _ = controller.start(open_camera, Instant::now());
                }
            }
            _ => {}
        }

        if clicked || key == Some(KEY_SPACE) {
            if let Err(e) = controller.resume(Instant::now()) {
                log::warn!("Failed to resume capture: {:#}", e);
            }
        }

        if let Err(e) = controller.tick(Instant::now()) {
            log::warn!("Sampling step failed: {:#}", e);
        }
    }

    let ledger = controller.ledger();
    log::info!(
        "Played {} rounds, win rate {:.1}%",
        ledger.len(),
        ledger.win_rate()
    );
    Ok(())
}
