//! Burn ML models for object detection.
//!
//! This crate defines the neural network architectures behind the detector
//! contract:
//! - `LinearNet`: channel-mean pooling followed by a small MLP.
//! - `ConvNet`: convolutional stem with adaptive average pooling.
//!
//! Both feed a class head and a box head, producing one detection candidate
//! per batch element. These are pure Burn Modules with no awareness of the
//! `Detector` trait; the `detectors` crate wraps them into contract
//! implementations.

use burn::module::Module;
use burn::nn;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig};
use burn::nn::PaddingConfig2d;
use burn::tensor::activation::{relu, sigmoid};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct LinearNetConfig {
    pub channels: usize,
    pub hidden: usize,
    pub num_classes: usize,
    pub dropout: f64,
}

impl Default for LinearNetConfig {
    fn default() -> Self {
        Self {
            channels: 3,
            hidden: 64,
            num_classes: 2,
            dropout: 0.1,
        }
    }
}

#[derive(Debug, Module)]
pub struct LinearNet<B: Backend> {
    linear1: nn::Linear<B>,
    linear2: nn::Linear<B>,
    class_head: nn::Linear<B>,
    box_head: nn::Linear<B>,
    dropout: nn::Dropout,
    num_classes: usize,
}

impl<B: Backend> LinearNet<B> {
    pub fn new(cfg: LinearNetConfig, device: &B::Device) -> Self {
        let num_classes = cfg.num_classes.max(1);
        let linear1 = nn::LinearConfig::new(cfg.channels, cfg.hidden).init(device);
        let linear2 = nn::LinearConfig::new(cfg.hidden, cfg.hidden).init(device);
        let class_head = nn::LinearConfig::new(cfg.hidden, num_classes).init(device);
        let box_head = nn::LinearConfig::new(cfg.hidden, 4).init(device);
        let dropout = nn::DropoutConfig::new(cfg.dropout).init();
        Self {
            linear1,
            linear2,
            class_head,
            box_head,
            dropout,
            num_classes,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Forward pass over an NCHW batch: returns (logits, boxes) with shapes
    /// `[batch, num_classes]` and `[batch, 4]`. Dropout runs only when
    /// `train_phase` is set.
    pub fn forward_detections(
        &self,
        images: Tensor<B, 4>,
        train_phase: bool,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let [batch, channels, _, _] = images.dims();
        let pooled = images.mean_dim(3).mean_dim(2).reshape([batch, channels]);
        let x = relu(self.linear1.forward(pooled));
        let x = if train_phase { self.dropout.forward(x) } else { x };
        let x = relu(self.linear2.forward(x));
        let logits = self.class_head.forward(x.clone());
        let boxes = order_boxes(sigmoid(self.box_head.forward(x)));
        (logits, boxes)
    }

    /// Sum of squared weights across the trainable layers, for the weight
    /// decay term.
    pub fn weight_squared_sum(&self) -> Tensor<B, 1> {
        square_sum(self.linear1.weight.val())
            + square_sum(self.linear2.weight.val())
            + square_sum(self.class_head.weight.val())
            + square_sum(self.box_head.weight.val())
    }
}

#[derive(Debug, Clone)]
pub struct ConvNetConfig {
    pub channels: usize,
    pub hidden: usize,
    pub num_classes: usize,
    pub dropout: f64,
}

impl Default for ConvNetConfig {
    fn default() -> Self {
        Self {
            channels: 3,
            hidden: 32,
            num_classes: 2,
            dropout: 0.1,
        }
    }
}

#[derive(Debug, Module)]
pub struct ConvNet<B: Backend> {
    stem: Conv2d<B>,
    block: Conv2d<B>,
    pool: AdaptiveAvgPool2d,
    fc: nn::Linear<B>,
    class_head: nn::Linear<B>,
    box_head: nn::Linear<B>,
    dropout: nn::Dropout,
    num_classes: usize,
}

impl<B: Backend> ConvNet<B> {
    pub fn new(cfg: ConvNetConfig, device: &B::Device) -> Self {
        let num_classes = cfg.num_classes.max(1);
        let stem = Conv2dConfig::new([cfg.channels, cfg.hidden], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let block = Conv2dConfig::new([cfg.hidden, cfg.hidden], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let pool = AdaptiveAvgPool2dConfig::new([1, 1]).init();
        let fc = nn::LinearConfig::new(cfg.hidden, cfg.hidden).init(device);
        let class_head = nn::LinearConfig::new(cfg.hidden, num_classes).init(device);
        let box_head = nn::LinearConfig::new(cfg.hidden, 4).init(device);
        let dropout = nn::DropoutConfig::new(cfg.dropout).init();
        Self {
            stem,
            block,
            pool,
            fc,
            class_head,
            box_head,
            dropout,
            num_classes,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Forward pass over an NCHW batch: returns (logits, boxes) with shapes
    /// `[batch, num_classes]` and `[batch, 4]`. Dropout runs only when
    /// `train_phase` is set.
    pub fn forward_detections(
        &self,
        images: Tensor<B, 4>,
        train_phase: bool,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let x = relu(self.stem.forward(images));
        let x = relu(self.block.forward(x));
        let x = self.pool.forward(x);
        let [batch, hidden, _, _] = x.dims();
        let x = x.reshape([batch, hidden]);
        let x = relu(self.fc.forward(x));
        let x = if train_phase { self.dropout.forward(x) } else { x };
        let logits = self.class_head.forward(x.clone());
        let boxes = order_boxes(sigmoid(self.box_head.forward(x)));
        (logits, boxes)
    }

    /// Sum of squared weights across the trainable layers, for the weight
    /// decay term.
    pub fn weight_squared_sum(&self) -> Tensor<B, 1> {
        square_sum(self.stem.weight.val())
            + square_sum(self.block.weight.val())
            + square_sum(self.fc.weight.val())
            + square_sum(self.class_head.weight.val())
            + square_sum(self.box_head.weight.val())
    }
}

fn square_sum<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Tensor<B, 1> {
    (tensor.clone() * tensor).sum()
}

/// Reorder/clamp raw box predictions to enforce x0 <= x1, y0 <= y1 within
/// [0,1] using arithmetic. Input and output have shape `[rows, 4]`.
fn order_boxes<B: Backend>(boxes: Tensor<B, 2>) -> Tensor<B, 2> {
    let rows = boxes.dims()[0];
    let x0 = boxes.clone().slice([0..rows, 0..1]);
    let y0 = boxes.clone().slice([0..rows, 1..2]);
    let x1 = boxes.clone().slice([0..rows, 2..3]);
    let y1 = boxes.slice([0..rows, 3..4]);

    let dx = x0.clone() - x1.clone();
    let dy = y0.clone() - y1.clone();
    let half = 0.5;

    let x_min = ((x0.clone() + x1.clone() - dx.clone().abs()) * half).clamp(0.0, 1.0);
    let x_max = ((x0 + x1 + dx.abs()) * half).clamp(0.0, 1.0);
    let y_min = ((y0.clone() + y1.clone() - dy.clone().abs()) * half).clamp(0.0, 1.0);
    let y_max = ((y0 + y1 + dy.abs()) * half).clamp(0.0, 1.0);

    Tensor::cat(vec![x_min, y_min, x_max, y_max], 1)
}

pub mod prelude {
    pub use super::{ConvNet, ConvNetConfig, LinearNet, LinearNetConfig};
}
