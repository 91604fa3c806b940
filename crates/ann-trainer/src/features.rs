//! Flattening decoded batches into the learner's input matrix.

use cifar_dataset::{Batch, IMAGE_BYTES, Image};
use ndarray::Array2;
use rayon::prelude::*;

/// Stack every image from `batches` into an `(n, IMAGE_BYTES)` float matrix.
///
/// Rows follow batch order, then record order within each batch. Each sample
/// is scaled to [0,1]; the decoder hands out raw bytes and scaling is this
/// side of the boundary. Rows are filled in parallel; each row touches only
/// its own chunk, so there is no shared state to guard.
pub fn feature_matrix(batches: &[Batch]) -> Array2<f32> {
    let images: Vec<&Image> = batches.iter().flat_map(|b| b.images.iter()).collect();
    let mut data = vec![0f32; images.len() * IMAGE_BYTES];
    data.par_chunks_mut(IMAGE_BYTES)
        .zip(images.par_iter())
        .for_each(|(row, image)| {
            for (dst, &sample) in row.iter_mut().zip(image.as_bytes()) {
                *dst = f32::from(sample) / 255.0;
            }
        });
    Array2::from_shape_vec((images.len(), IMAGE_BYTES), data)
        .expect("row count times row width matches buffer length")
}

/// Concatenate labels from `batches` in the same order as [`feature_matrix`].
pub fn label_vec(batches: &[Batch]) -> Vec<u8> {
    batches.iter().flat_map(|b| b.labels.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cifar_dataset::{RECORD_SIZE, decode_record};

    fn batch_of(labels: &[u8], pixel: u8) -> Batch {
        let mut batch = Batch::default();
        for &label in labels {
            let mut buf = [pixel; RECORD_SIZE];
            buf[0] = label;
            let (label, image) = decode_record(&buf);
            batch.labels.push(label);
            batch.images.push(image);
        }
        batch
    }

    #[test]
    fn rows_are_scaled_to_unit_range() {
        let batches = vec![batch_of(&[1], 255)];
        let features = feature_matrix(&batches);
        assert_eq!(features.dim(), (1, IMAGE_BYTES));
        assert!(features.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn rows_follow_batch_then_record_order() {
        let batches = vec![batch_of(&[0, 1], 10), batch_of(&[2], 20)];
        let features = feature_matrix(&batches);
        assert_eq!(features.dim(), (3, IMAGE_BYTES));
        assert_eq!(features[(0, 0)], 10.0 / 255.0);
        assert_eq!(features[(2, 0)], 20.0 / 255.0);
        assert_eq!(label_vec(&batches), vec![0, 1, 2]);
    }

    #[test]
    fn empty_batches_yield_an_empty_matrix() {
        let features = feature_matrix(&[]);
        assert_eq!(features.dim(), (0, IMAGE_BYTES));
        assert!(label_vec(&[]).is_empty());
    }
}
