//! Per-source batch loading: fixed-size record reads until the file runs dry.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;

use crate::record::{Image, decode_record};
use crate::{RECORD_SIZE, RECORDS_PER_BATCH};

/// The ordered records decoded from one source file.
///
/// `labels[i]` describes `images[i]`. Labels are kept verbatim, including
/// values outside the class range; the one-hot projection is where those get
/// dropped.
#[derive(Debug, Default, Clone)]
pub struct Batch {
    pub images: Vec<Image>,
    pub labels: Vec<u8>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Read up to [`RECORDS_PER_BATCH`] records from `path`.
///
/// A short read (fewer than [`RECORD_SIZE`] bytes left, including zero) ends
/// the batch cleanly; trailing partial-record bytes are dropped. The only
/// error path is the file itself: a path that cannot be opened or a read
/// failure mid-stream.
pub fn load_batch(path: &Path) -> Result<Batch> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut batch = Batch {
        images: Vec::with_capacity(RECORDS_PER_BATCH),
        labels: Vec::with_capacity(RECORDS_PER_BATCH),
    };
    let mut buf = [0u8; RECORD_SIZE];
    for _ in 0..RECORDS_PER_BATCH {
        if !fill_record(&mut reader, &mut buf)
            .with_context(|| format!("failed to read {}", path.display()))?
        {
            break;
        }
        let (label, image) = decode_record(&buf);
        batch.labels.push(label);
        batch.images.push(image);
    }

    if batch.len() < RECORDS_PER_BATCH {
        warn!(
            "{}: short batch ({} of {} records)",
            path.display(),
            batch.len(),
            RECORDS_PER_BATCH
        );
    }
    Ok(batch)
}

/// Fill `buf` with the next record. Returns `false` when the source is
/// exhausted, whether the boundary was clean or mid-record.
fn fill_record<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}
