use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use detector_core::{Detections, Detector, DetectorError, DetectorResult, GroundTruth, ModelSpec};
use models::{LinearNet, LinearNetConfig};

use crate::loss::{combined_loss, LossWeights};

#[derive(Debug, Clone, Default)]
pub struct LinearDetectorConfig {
    pub net: LinearNetConfig,
    pub loss: LossWeights,
}

/// Pooled-MLP detector: the cheapest conforming implementation, useful as a
/// baseline and in tests.
#[derive(Debug)]
pub struct LinearDetector<B: Backend> {
    net: LinearNet<B>,
    loss_weights: LossWeights,
}

impl<B: Backend> LinearDetector<B> {
    pub fn new(cfg: LinearDetectorConfig, device: &B::Device) -> Self {
        Self {
            net: LinearNet::new(cfg.net, device),
            loss_weights: cfg.loss,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.net.num_classes()
    }
}

impl<B: Backend> Detector<B> for LinearDetector<B> {
    fn get(&self, images: Tensor<B, 4>, spec: &ModelSpec) -> DetectorResult<Detections<B>> {
        spec.validate()?;
        let [batch, _, _, _] = images.dims();
        if batch == 0 {
            return Err(DetectorError::EmptyBatch);
        }
        if spec.num_classes != self.net.num_classes() {
            return Err(DetectorError::ClassCountMismatch {
                expected: self.net.num_classes(),
                requested: spec.num_classes,
            });
        }

        let (logits, bboxes) = self.net.forward_detections(images, spec.train_phase);
        let mut detections = Detections::new(spec.train_phase, logits, bboxes)?;
        if spec.train_phase && spec.l2_penalty > 0.0 {
            let penalty = self.net.weight_squared_sum().mul_scalar(spec.l2_penalty);
            detections = detections.with_weight_penalty(penalty);
        }
        Ok(detections)
    }

    fn loss(
        &self,
        detections: &Detections<B>,
        truth: &GroundTruth<B>,
    ) -> DetectorResult<Tensor<B, 1>> {
        combined_loss(detections, truth, self.loss_weights)
    }
}
