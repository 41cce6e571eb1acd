//! Contract layer for object-detection models.
//!
//! This crate defines the `Detector` capability that concrete detection
//! models implement, plus the types that cross that boundary: `ModelSpec`
//! (graph-construction parameters), `Detections` (model outputs), and
//! `GroundTruth` (labels paired with box coordinates). No model code lives
//! here; architectures and loss arithmetic belong to the `models` and
//! `detectors` crates.

pub mod interfaces;
pub mod types;

pub use interfaces::{Detections, Detector, GroundTruth, ModelSpec};
pub use types::{DetectorError, DetectorResult};

pub mod prelude {
    pub use crate::interfaces::{Detections, Detector, GroundTruth, ModelSpec};
    pub use crate::types::{DetectorError, DetectorResult};
}
