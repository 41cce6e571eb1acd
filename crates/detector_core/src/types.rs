//! Error definitions shared across the detector contract.

use thiserror::Error;

pub type DetectorResult<T> = Result<T, DetectorError>;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("empty batch: at least one image is required")]
    EmptyBatch,
    #[error("invalid class count {num_classes}: detectors predict at least one class")]
    InvalidClassCount { num_classes: usize },
    #[error("invalid l2 penalty {l2_penalty}: must be finite and non-negative")]
    InvalidPenalty { l2_penalty: f32 },
    #[error("model was built for {expected} classes but the spec requested {requested}")]
    ClassCountMismatch { expected: usize, requested: usize },
    #[error("shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: String,
        actual: String,
    },
}
