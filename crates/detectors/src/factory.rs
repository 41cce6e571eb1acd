use burn::tensor::backend::Backend;
use detector_core::Detector;
use models::{ConvNetConfig, LinearNetConfig};

use crate::{
    ConvolutionalDetector, ConvolutionalDetectorConfig, LinearDetector, LinearDetectorConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    Linear,
    Convolutional,
}

/// Build a boxed detector for the requested kind and class count, so
/// drivers can stay agnostic of the concrete architecture.
pub fn build_detector<B: Backend>(
    kind: DetectorKind,
    num_classes: usize,
    device: &B::Device,
) -> Box<dyn Detector<B> + Send + Sync> {
    match kind {
        DetectorKind::Linear => {
            log::info!("building linear detector for {num_classes} classes");
            let cfg = LinearDetectorConfig {
                net: LinearNetConfig {
                    num_classes,
                    ..Default::default()
                },
                ..Default::default()
            };
            Box::new(LinearDetector::new(cfg, device))
        }
        DetectorKind::Convolutional => {
            log::info!("building convolutional detector for {num_classes} classes");
            let cfg = ConvolutionalDetectorConfig {
                net: ConvNetConfig {
                    num_classes,
                    ..Default::default()
                },
                ..Default::default()
            };
            Box::new(ConvolutionalDetector::new(cfg, device))
        }
    }
}
