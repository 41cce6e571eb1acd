//! Loss building blocks shared by the detector implementations.

use burn::nn::loss::CrossEntropyLossConfig;
use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};
use detector_core::{Detections, DetectorError, DetectorResult, GroundTruth};
use serde::{Deserialize, Serialize};

/// Per-term weights for the combined loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossWeights {
    pub classification: f32,
    pub localization: f32,
}

impl Default for LossWeights {
    fn default() -> Self {
        Self {
            classification: 1.0,
            localization: 1.0,
        }
    }
}

/// Softmax cross-entropy between per-candidate logits and class labels.
pub fn classification_loss<B: Backend>(
    logits: Tensor<B, 2>,
    labels: Tensor<B, 1, Int>,
) -> Tensor<B, 1> {
    let device = logits.device();
    CrossEntropyLossConfig::new()
        .init(&device)
        .forward(logits, labels)
}

/// Mean absolute error between predicted and ground-truth box coordinates.
pub fn localization_loss<B: Backend>(
    bboxes: Tensor<B, 2>,
    coordinates: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let [rows, cols] = bboxes.dims();
    (bboxes - coordinates)
        .abs()
        .sum()
        .div_scalar((rows * cols) as f32)
}

/// Weighted classification + localization loss, plus the weight penalty
/// collected during graph construction when present.
pub(crate) fn combined_loss<B: Backend>(
    detections: &Detections<B>,
    truth: &GroundTruth<B>,
    weights: LossWeights,
) -> DetectorResult<Tensor<B, 1>> {
    if detections.rows() != truth.rows() {
        return Err(DetectorError::ShapeMismatch {
            what: "loss rows",
            expected: format!("{} prediction rows", detections.rows()),
            actual: format!("{} ground-truth rows", truth.rows()),
        });
    }

    let class_term = classification_loss(detections.logits().clone(), truth.labels().clone())
        .mul_scalar(weights.classification);
    let box_term = localization_loss(detections.bboxes().clone(), truth.coordinates().clone())
        .mul_scalar(weights.localization);

    let mut total = class_term + box_term;
    if let Some(penalty) = detections.weight_penalty() {
        total = total + penalty.clone();
    }
    Ok(total)
}
