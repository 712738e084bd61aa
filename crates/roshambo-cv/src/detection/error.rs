use roshambo_core::GestureError;
use thiserror::Error;

/// Failures that abandon a detection round
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not decode candidate image: {0}")]
    Decode(String),

    #[error("{stage} network failed: {cause:#}")]
    Inference {
        stage: &'static str,
        cause: anyhow::Error,
    },

    #[error("unexpected network output shape {actual:?}, expected {expected}")]
    OutputShape { expected: String, actual: Vec<usize> },

    #[error(transparent)]
    Label(#[from] GestureError),
}
