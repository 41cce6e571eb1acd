use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};
use serde::{Deserialize, Serialize};

use crate::types::{DetectorError, DetectorResult};

/// Parameters for building the detection graph over a batch of images.
///
/// `new` applies the contract defaults: inference-mode construction with no
/// weight decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Number of target categories. Must be at least 1.
    pub num_classes: usize,
    /// Training-mode construction: enables training-only layers and makes
    /// the weight penalty eligible for collection.
    pub train_phase: bool,
    /// Weight-decay strength. Interpretation is left to implementations.
    pub l2_penalty: f32,
}

impl ModelSpec {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            train_phase: false,
            l2_penalty: 0.0,
        }
    }

    pub fn with_train_phase(mut self, train_phase: bool) -> Self {
        self.train_phase = train_phase;
        self
    }

    pub fn with_l2_penalty(mut self, l2_penalty: f32) -> Self {
        self.l2_penalty = l2_penalty;
        self
    }

    pub fn validate(&self) -> DetectorResult<()> {
        if self.num_classes == 0 {
            return Err(DetectorError::InvalidClassCount {
                num_classes: self.num_classes,
            });
        }
        if !self.l2_penalty.is_finite() || self.l2_penalty < 0.0 {
            return Err(DetectorError::InvalidPenalty {
                l2_penalty: self.l2_penalty,
            });
        }
        Ok(())
    }
}

/// Output of building the detection graph.
///
/// Holds the unscaled per-class scores and the predicted box coordinates,
/// one row per detection candidate. The constructor rejects prediction
/// pairs whose row counts disagree, so every `Detections` value satisfies
/// the alignment invariant by construction.
#[derive(Debug, Clone)]
pub struct Detections<B: Backend> {
    is_training: bool,
    logits: Tensor<B, 2>,
    bboxes: Tensor<B, 2>,
    weight_penalty: Option<Tensor<B, 1>>,
}

impl<B: Backend> Detections<B> {
    pub fn new(
        is_training: bool,
        logits: Tensor<B, 2>,
        bboxes: Tensor<B, 2>,
    ) -> DetectorResult<Self> {
        let logit_rows = logits.dims()[0];
        let [box_rows, box_cols] = bboxes.dims();
        if box_cols != 4 {
            return Err(DetectorError::ShapeMismatch {
                what: "bbox columns",
                expected: "4 coordinates per box".to_string(),
                actual: format!("{box_cols} columns"),
            });
        }
        if logit_rows != box_rows {
            return Err(DetectorError::ShapeMismatch {
                what: "detection rows",
                expected: format!("{logit_rows} bbox rows to match logits"),
                actual: format!("{box_rows} bbox rows"),
            });
        }
        Ok(Self {
            is_training,
            logits,
            bboxes,
            weight_penalty: None,
        })
    }

    /// Attach the weight-decay term collected during graph construction.
    pub fn with_weight_penalty(mut self, penalty: Tensor<B, 1>) -> Self {
        self.weight_penalty = Some(penalty);
        self
    }

    /// Whether the graph was built for training.
    pub fn is_training(&self) -> bool {
        self.is_training
    }

    /// Unscaled per-class scores, shape `[rows, num_classes]`.
    pub fn logits(&self) -> &Tensor<B, 2> {
        &self.logits
    }

    /// Predicted box coordinates, shape `[rows, 4]`, row-aligned with the
    /// logits.
    pub fn bboxes(&self) -> &Tensor<B, 2> {
        &self.bboxes
    }

    /// Weight-decay term, present when training-mode construction collected
    /// one.
    pub fn weight_penalty(&self) -> Option<&Tensor<B, 1>> {
        self.weight_penalty.as_ref()
    }

    pub fn rows(&self) -> usize {
        self.logits.dims()[0]
    }
}

/// Ground-truth targets for a batch: one class label and one box per row.
#[derive(Debug, Clone)]
pub struct GroundTruth<B: Backend> {
    labels: Tensor<B, 1, Int>,
    coordinates: Tensor<B, 2>,
}

impl<B: Backend> GroundTruth<B> {
    pub fn new(labels: Tensor<B, 1, Int>, coordinates: Tensor<B, 2>) -> DetectorResult<Self> {
        let label_rows = labels.dims()[0];
        let [coord_rows, coord_cols] = coordinates.dims();
        if coord_cols != 4 {
            return Err(DetectorError::ShapeMismatch {
                what: "coordinate columns",
                expected: "4 coordinates per box".to_string(),
                actual: format!("{coord_cols} columns"),
            });
        }
        if label_rows != coord_rows {
            return Err(DetectorError::ShapeMismatch {
                what: "ground-truth rows",
                expected: format!("{label_rows} coordinate rows to match labels"),
                actual: format!("{coord_rows} coordinate rows"),
            });
        }
        Ok(Self {
            labels,
            coordinates,
        })
    }

    /// Class indices, shape `[rows]`.
    pub fn labels(&self) -> &Tensor<B, 1, Int> {
        &self.labels
    }

    /// Ground-truth box coordinates, shape `[rows, 4]`, row-aligned with
    /// the labels.
    pub fn coordinates(&self) -> &Tensor<B, 2> {
        &self.coordinates
    }

    pub fn rows(&self) -> usize {
        self.labels.dims()[0]
    }
}

/// The capability a concrete detection model must provide.
///
/// Both operations are mandatory; a type missing either does not implement
/// the trait and cannot be handed to a driver. The trait is object-safe,
/// so drivers may hold `Box<dyn Detector<B>>` and stay agnostic of the
/// concrete architecture.
pub trait Detector<B: Backend> {
    /// Build the detection graph for a batch of images: run the model in
    /// the mode selected by `spec` and produce per-candidate scores and
    /// row-aligned box predictions.
    fn get(&self, images: Tensor<B, 4>, spec: &ModelSpec) -> DetectorResult<Detections<B>>;

    /// Combine classification and localization error, plus any weight
    /// penalty collected by `get`, into a single scalar loss.
    fn loss(
        &self,
        detections: &Detections<B>,
        truth: &GroundTruth<B>,
    ) -> DetectorResult<Tensor<B, 1>>;
}
