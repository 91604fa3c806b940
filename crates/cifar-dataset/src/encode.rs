//! One-hot label projection for the downstream learner.

use ndarray::Array2;

/// Project labels into a `(labels.len(), num_classes)` one-hot matrix.
///
/// Row `i` is all zero except column `labels[i]` set to 1.0. A label outside
/// `[0, num_classes)` produces an all-zero row rather than an error; decode
/// and batch assembly keep such labels verbatim, and this projection is the
/// single place they drop out.
pub fn to_one_hot(labels: &[u8], num_classes: usize) -> Array2<f32> {
    let mut one_hot = Array2::zeros((labels.len(), num_classes));
    for (i, &label) in labels.iter().enumerate() {
        if (label as usize) < num_classes {
            one_hot[(i, label as usize)] = 1.0;
        }
    }
    one_hot
}
