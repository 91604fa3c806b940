//! Train/test aggregation across multiple batch sources.

use std::path::Path;

use anyhow::Result;
use log::info;

use crate::batch::{Batch, load_batch};

/// Every decoded batch: ordered train batches plus one test batch.
///
/// Owns all images and labels it decoded; nothing refers back to the source
/// files once [`Dataset::load`] returns. Train batches keep the input path
/// order and are never merged.
#[derive(Debug)]
pub struct Dataset {
    pub train_batches: Vec<Batch>,
    pub test_batch: Batch,
}

impl Dataset {
    /// Load one batch per train path, then the test batch.
    ///
    /// Aborts on the first source that cannot be read, propagating that
    /// path's error; no partially-filled dataset is ever returned.
    pub fn load<P: AsRef<Path>>(train_paths: &[P], test_path: impl AsRef<Path>) -> Result<Self> {
        let mut train_batches = Vec::with_capacity(train_paths.len());
        for path in train_paths {
            train_batches.push(load_batch(path.as_ref())?);
        }
        let test_batch = load_batch(test_path.as_ref())?;

        let train_records: usize = train_batches.iter().map(Batch::len).sum();
        info!(
            "loaded {} train records across {} batches, {} test records",
            train_records,
            train_batches.len(),
            test_batch.len()
        );

        Ok(Self {
            train_batches,
            test_batch,
        })
    }

    /// Total training records across all batches.
    pub fn num_train_records(&self) -> usize {
        self.train_batches.iter().map(Batch::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RECORD_SIZE;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_batch_file(dir: &Path, name: &str, labels: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut bytes = Vec::new();
        for &label in labels {
            let mut record = vec![0u8; RECORD_SIZE];
            record[0] = label;
            bytes.extend_from_slice(&record);
        }
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn train_batches_preserve_path_order() {
        let dir = tempdir().unwrap();
        let train = vec![
            write_batch_file(dir.path(), "a.bin", &[1, 1]),
            write_batch_file(dir.path(), "b.bin", &[2]),
            write_batch_file(dir.path(), "c.bin", &[3, 3, 3]),
        ];
        let test = write_batch_file(dir.path(), "t.bin", &[9]);

        let dataset = Dataset::load(&train, &test).unwrap();
        assert_eq!(dataset.train_batches.len(), 3);
        assert_eq!(dataset.train_batches[0].labels, vec![1, 1]);
        assert_eq!(dataset.train_batches[1].labels, vec![2]);
        assert_eq!(dataset.train_batches[2].labels, vec![3, 3, 3]);
        assert_eq!(dataset.test_batch.labels, vec![9]);
        assert_eq!(dataset.num_train_records(), 6);
    }

    #[test]
    fn unreadable_train_path_aborts_the_load() {
        let dir = tempdir().unwrap();
        let train = vec![
            write_batch_file(dir.path(), "a.bin", &[1]),
            dir.path().join("missing.bin"),
        ];
        let test = write_batch_file(dir.path(), "t.bin", &[0]);

        let err = Dataset::load(&train, &test).unwrap_err();
        assert!(err.to_string().contains("missing.bin"));
    }

    #[test]
    fn unreadable_test_path_aborts_the_load() {
        let dir = tempdir().unwrap();
        let train = vec![write_batch_file(dir.path(), "a.bin", &[1])];

        let err = Dataset::load(&train, dir.path().join("missing_test.bin")).unwrap_err();
        assert!(err.to_string().contains("missing_test.bin"));
    }
}
