#![recursion_limit = "256"]

//! Detector implementations over the Burn architectures in `models`, plus
//! the loss arithmetic they share and a factory for building them by kind.

pub mod convolutional;
pub mod factory;
pub mod linear;
pub mod loss;

/// Backend alias (NdArray by default; WGPU if enabled).
#[cfg(feature = "backend-wgpu")]
pub type DefaultBackend = burn_wgpu::Wgpu<f32>;
#[cfg(not(feature = "backend-wgpu"))]
pub type DefaultBackend = burn_ndarray::NdArray<f32>;

pub use convolutional::{ConvolutionalDetector, ConvolutionalDetectorConfig};
pub use factory::{build_detector, DetectorKind};
pub use linear::{LinearDetector, LinearDetectorConfig};
pub use loss::{classification_loss, localization_loss, LossWeights};

pub mod prelude {
    pub use crate::convolutional::{ConvolutionalDetector, ConvolutionalDetectorConfig};
    pub use crate::factory::{build_detector, DetectorKind};
    pub use crate::linear::{LinearDetector, LinearDetectorConfig};
    pub use crate::loss::LossWeights;
    pub use crate::DefaultBackend;
}
