use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};
use burn_ndarray::NdArray;
use detector_core::{
    Detections, Detector, DetectorError, DetectorResult, GroundTruth, ModelSpec,
};

type TestBackend = NdArray<f32>;

/// Minimal conforming implementation: fixed scores and boxes, absolute box
/// error as the loss. Exists only to drive the contract.
struct StaticDetector;

impl<B: Backend> Detector<B> for StaticDetector {
    fn get(&self, images: Tensor<B, 4>, spec: &ModelSpec) -> DetectorResult<Detections<B>> {
        spec.validate()?;
        let [batch, _, _, _] = images.dims();
        if batch == 0 {
            return Err(DetectorError::EmptyBatch);
        }
        let device = images.device();
        let logits = Tensor::zeros([batch, spec.num_classes], &device);
        let bboxes = Tensor::full([batch, 4], 0.25, &device);
        Detections::new(spec.train_phase, logits, bboxes)
    }

    fn loss(
        &self,
        detections: &Detections<B>,
        truth: &GroundTruth<B>,
    ) -> DetectorResult<Tensor<B, 1>> {
        if detections.rows() != truth.rows() {
            return Err(DetectorError::ShapeMismatch {
                what: "loss rows",
                expected: format!("{} prediction rows", detections.rows()),
                actual: format!("{} ground-truth rows", truth.rows()),
            });
        }
        let rows = detections.rows() as f32;
        Ok((detections.bboxes().clone() - truth.coordinates().clone())
            .abs()
            .sum()
            .div_scalar(rows))
    }
}

fn device() -> <TestBackend as Backend>::Device {
    <TestBackend as Backend>::Device::default()
}

#[test]
fn model_spec_defaults() {
    let spec = ModelSpec::new(10);
    assert_eq!(spec.num_classes, 10);
    assert!(!spec.train_phase);
    assert_eq!(spec.l2_penalty, 0.0);
}

#[test]
fn model_spec_rejects_invalid_values() {
    assert!(matches!(
        ModelSpec::new(0).validate(),
        Err(DetectorError::InvalidClassCount { num_classes: 0 })
    ));
    assert!(matches!(
        ModelSpec::new(3).with_l2_penalty(-0.5).validate(),
        Err(DetectorError::InvalidPenalty { .. })
    ));
    assert!(matches!(
        ModelSpec::new(3).with_l2_penalty(f32::NAN).validate(),
        Err(DetectorError::InvalidPenalty { .. })
    ));
}

#[test]
fn get_returns_row_aligned_outputs() -> anyhow::Result<()> {
    let device = device();
    let images = Tensor::<TestBackend, 4>::zeros([2, 3, 8, 8], &device);
    let spec = ModelSpec::new(10).with_train_phase(true).with_l2_penalty(0.0);

    let detections = StaticDetector.get(images, &spec)?;
    assert!(detections.is_training());
    assert_eq!(detections.logits().dims(), [2, 10]);
    assert_eq!(detections.bboxes().dims(), [2, 4]);
    assert_eq!(detections.rows(), 2);
    Ok(())
}

#[test]
fn loss_is_a_single_scalar() -> anyhow::Result<()> {
    let device = device();
    let images = Tensor::<TestBackend, 4>::zeros([2, 3, 4, 4], &device);
    let detections = StaticDetector.get(images, &ModelSpec::new(3))?;

    let labels = Tensor::<TestBackend, 1, Int>::from_ints([0, 2], &device);
    let coordinates = Tensor::<TestBackend, 2>::from_floats(
        [[0.1, 0.1, 0.4, 0.4], [0.2, 0.3, 0.6, 0.9]],
        &device,
    );
    let truth = GroundTruth::new(labels, coordinates)?;

    let loss = StaticDetector.loss(&detections, &truth)?;
    assert_eq!(loss.dims(), [1]);
    let value = loss.into_data().to_vec::<f32>().unwrap_or_default()[0];
    assert!(value.is_finite());
    Ok(())
}

#[test]
fn detections_reject_row_mismatch() {
    let device = device();
    let logits = Tensor::<TestBackend, 2>::zeros([2, 3], &device);
    let bboxes = Tensor::<TestBackend, 2>::zeros([3, 4], &device);
    assert!(matches!(
        Detections::new(false, logits, bboxes),
        Err(DetectorError::ShapeMismatch { .. })
    ));

    let logits = Tensor::<TestBackend, 2>::zeros([2, 3], &device);
    let bad_boxes = Tensor::<TestBackend, 2>::zeros([2, 5], &device);
    assert!(matches!(
        Detections::new(false, logits, bad_boxes),
        Err(DetectorError::ShapeMismatch { .. })
    ));
}

#[test]
fn ground_truth_rejects_row_mismatch() {
    let device = device();
    let labels = Tensor::<TestBackend, 1, Int>::from_ints([0, 1], &device);
    let coordinates = Tensor::<TestBackend, 2>::zeros([3, 4], &device);
    assert!(matches!(
        GroundTruth::new(labels, coordinates),
        Err(DetectorError::ShapeMismatch { .. })
    ));
}

#[test]
fn loss_rejects_row_mismatch() -> anyhow::Result<()> {
    let device = device();
    let images = Tensor::<TestBackend, 4>::zeros([2, 3, 4, 4], &device);
    let detections = StaticDetector.get(images, &ModelSpec::new(3))?;

    let labels = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 2], &device);
    let coordinates = Tensor::<TestBackend, 2>::zeros([3, 4], &device);
    let truth = GroundTruth::new(labels, coordinates)?;

    assert!(matches!(
        StaticDetector.loss(&detections, &truth),
        Err(DetectorError::ShapeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn get_rejects_empty_batch() {
    let device = device();
    let images = Tensor::<TestBackend, 4>::empty([0, 3, 4, 4], &device);
    assert!(matches!(
        StaticDetector.get(images, &ModelSpec::new(3)),
        Err(DetectorError::EmptyBatch)
    ));
}
