mod features;
mod model;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;

use cifar_dataset::{CLASS_NAMES, Dataset, NUM_CLASSES, to_one_hot};
use features::{feature_matrix, label_vec};
use model::{Classifier, accuracy, predicted_labels};

/// File names inside the standard CIFAR-10 binary release.
const TRAIN_FILES: [&str; 5] = [
    "data_batch_1.bin",
    "data_batch_2.bin",
    "data_batch_3.bin",
    "data_batch_4.bin",
    "data_batch_5.bin",
];
const TEST_FILE: &str = "test_batch.bin";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Train an MLP classifier on the CIFAR-10 binary batches"
)]
struct Cli {
    /// Directory containing data_batch_*.bin and test_batch.bin
    #[arg(long, value_name = "DIR", default_value = "cifar-10-batches-bin")]
    data_dir: PathBuf,

    /// Number of training epochs
    #[arg(long, default_value_t = 10)]
    epochs: usize,

    /// SGD learning rate
    #[arg(long, default_value_t = 0.1)]
    lr: f64,

    /// Minibatch size
    #[arg(long, default_value_t = 256)]
    batch_size: usize,

    /// Write trained weights here (safetensors)
    #[arg(long, value_name = "FILE")]
    model_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let train_paths: Vec<PathBuf> = TRAIN_FILES
        .iter()
        .map(|name| cli.data_dir.join(name))
        .collect();
    let test_path = cli.data_dir.join(TEST_FILE);
    let dataset = Dataset::load(&train_paths, &test_path)?;

    let train_features = feature_matrix(&dataset.train_batches);
    let train_labels = label_vec(&dataset.train_batches);
    let train_targets = to_one_hot(&train_labels, NUM_CLASSES);
    info!("training on {} samples", train_features.nrows());

    let mut classifier = Classifier::new()?;
    classifier.train(
        &train_features,
        &train_targets,
        cli.epochs,
        cli.lr,
        cli.batch_size,
    )?;

    let test_features = feature_matrix(std::slice::from_ref(&dataset.test_batch));
    let scores = classifier.predict(&test_features)?;
    info!(
        "test accuracy: {:.2}%",
        accuracy(&scores, &dataset.test_batch.labels)
    );
    log_per_class(&scores, &dataset.test_batch.labels);

    if let Some(path) = cli.model_out {
        classifier.save(&path)?;
        info!("saved model to {}", path.display());
    }
    Ok(())
}

fn log_per_class(scores: &ndarray::Array2<f32>, labels: &[u8]) {
    let predicted = predicted_labels(scores);
    let mut correct = [0usize; NUM_CLASSES];
    let mut totals = [0usize; NUM_CLASSES];
    for (p, &label) in predicted.iter().zip(labels) {
        if (label as usize) < NUM_CLASSES {
            totals[label as usize] += 1;
            if *p == label {
                correct[label as usize] += 1;
            }
        }
    }
    for (idx, name) in CLASS_NAMES.iter().enumerate() {
        if totals[idx] > 0 {
            info!(
                "{name}: {}/{} ({:.1}%)",
                correct[idx],
                totals[idx],
                correct[idx] as f64 / totals[idx] as f64 * 100.0
            );
        }
    }
}
