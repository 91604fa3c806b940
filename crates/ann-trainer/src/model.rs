//! Thin MLP classifier over candle.
//!
//! The boundary with the dataset side is a pair of matrices: features
//! `(n, IMAGE_BYTES)` scaled to [0,1] and one-hot targets `(n, NUM_CLASSES)`.
//! Prediction hands back an `(n, NUM_CLASSES)` score matrix; the label is the
//! arg-max column. Architecture and optimization stay the library's concern.

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{Linear, Module, Optimizer, SGD, VarBuilder, VarMap, linear, ops};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use ndarray::Array2;

use cifar_dataset::{IMAGE_BYTES, NUM_CLASSES};

const HIDDEN_1: usize = 1024;
const HIDDEN_2: usize = 256;

struct Mlp {
    l1: Linear,
    l2: Linear,
    l3: Linear,
}

impl Mlp {
    fn new(vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(Self {
            l1: linear(IMAGE_BYTES, HIDDEN_1, vb.pp("l1"))?,
            l2: linear(HIDDEN_1, HIDDEN_2, vb.pp("l2"))?,
            l3: linear(HIDDEN_2, NUM_CLASSES, vb.pp("l3"))?,
        })
    }
}

impl Module for Mlp {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = self.l1.forward(xs)?.relu()?;
        let xs = self.l2.forward(&xs)?.relu()?;
        // Sigmoid keeps scores in (0,1), matching the one-hot targets.
        ops::sigmoid(&self.l3.forward(&xs)?)
    }
}

/// The trained (or trainable) classifier plus its parameter store.
pub struct Classifier {
    varmap: VarMap,
    net: Mlp,
    device: Device,
}

impl Classifier {
    pub fn new() -> Result<Self> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let net = Mlp::new(vb)?;
        Ok(Self {
            varmap,
            net,
            device,
        })
    }

    /// Fit against one-hot targets with minibatch SGD on an MSE objective.
    pub fn train(
        &mut self,
        features: &Array2<f32>,
        targets: &Array2<f32>,
        epochs: usize,
        lr: f64,
        batch_size: usize,
    ) -> Result<()> {
        let n = features.nrows();
        let x = to_tensor(features, &self.device)?;
        let y = to_tensor(targets, &self.device)?;
        let mut opt = SGD::new(self.varmap.all_vars(), lr)?;

        let pb = ProgressBar::new(epochs as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] {wide_bar} {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );

        for epoch in 1..=epochs {
            let mut epoch_loss = 0f64;
            let mut num_batches = 0usize;
            for start in (0..n).step_by(batch_size) {
                let len = batch_size.min(n - start);
                let xb = x.narrow(0, start, len)?;
                let yb = y.narrow(0, start, len)?;
                let scores = self.net.forward(&xb)?;
                let loss = candle_nn::loss::mse(&scores, &yb)?;
                opt.backward_step(&loss)?;
                epoch_loss += f64::from(loss.to_scalar::<f32>()?);
                num_batches += 1;
            }
            if num_batches > 0 {
                info!(
                    "epoch {epoch}/{epochs}: mean loss {:.6}",
                    epoch_loss / num_batches as f64
                );
            }
            pb.inc(1);
        }
        pb.finish_with_message("training complete");
        Ok(())
    }

    /// Score every sample; returns the `(n, NUM_CLASSES)` prediction matrix.
    pub fn predict(&self, features: &Array2<f32>) -> Result<Array2<f32>> {
        let x = to_tensor(features, &self.device)?;
        let scores = self.net.forward(&x)?;
        let flat = scores.flatten_all()?.to_vec1::<f32>()?;
        Ok(Array2::from_shape_vec((features.nrows(), NUM_CLASSES), flat)?)
    }

    /// Persist the trained weights; the on-disk format is the library's.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.varmap
            .save(path)
            .with_context(|| format!("failed to save model to {}", path.display()))
    }
}

fn to_tensor(matrix: &Array2<f32>, device: &Device) -> Result<Tensor> {
    let (rows, cols) = matrix.dim();
    let standard = matrix.as_standard_layout();
    let slice = standard
        .as_slice()
        .expect("standard layout array is contiguous");
    Ok(Tensor::from_slice(slice, (rows, cols), device)?)
}

/// Arg-max of each score row; ties go to the lowest column index.
pub fn predicted_labels(scores: &Array2<f32>) -> Vec<u8> {
    scores
        .outer_iter()
        .map(|row| {
            let mut best = 0usize;
            let mut best_score = f32::NEG_INFINITY;
            for (idx, &score) in row.iter().enumerate() {
                if score > best_score {
                    best = idx;
                    best_score = score;
                }
            }
            best as u8
        })
        .collect()
}

/// Fraction of rows whose arg-max matches `labels`, as a percentage.
pub fn accuracy(scores: &Array2<f32>, labels: &[u8]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let predicted = predicted_labels(scores);
    let correct = predicted
        .iter()
        .zip(labels)
        .filter(|(p, label)| p == label)
        .count();
    correct as f64 / labels.len() as f64 * 100.0
}
