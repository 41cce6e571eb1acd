use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use detector_core::{Detections, Detector, DetectorError, DetectorResult, GroundTruth, ModelSpec};
use models::{ConvNet, ConvNetConfig};

use crate::loss::{combined_loss, LossWeights};

#[derive(Debug, Clone, Default)]
pub struct ConvolutionalDetectorConfig {
    pub net: ConvNetConfig,
    pub loss: LossWeights,
}

/// Convolutional detector: the heavier reference implementation with a
/// spatial stem in front of the heads.
#[derive(Debug)]
pub struct ConvolutionalDetector<B: Backend> {
    net: ConvNet<B>,
    loss_weights: LossWeights,
}

impl<B: Backend> ConvolutionalDetector<B> {
    pub fn new(cfg: ConvolutionalDetectorConfig, device: &B::Device) -> Self {
        Self {
            net: ConvNet::new(cfg.net, device),
            loss_weights: cfg.loss,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.net.num_classes()
    }
}

impl<B: Backend> Detector<B> for ConvolutionalDetector<B> {
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
