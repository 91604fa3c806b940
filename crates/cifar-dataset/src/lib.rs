//! Decoding for the CIFAR-10 binary batch format.
//!
//! Each source file is a headerless stream of fixed-size records:
//!
//! ```text
//! byte 0          label, unsigned 8-bit
//! bytes 1..1025   red plane, row-major, 32x32
//! bytes 1025..2049  green plane
//! bytes 2049..3073  blue plane
//! ```
//!
//! 3073 bytes per record, no delimiters, no padding, nominally 10,000 records
//! per file. Decoding reorders the planar samples into interleaved
//! blue/green/red pixels; everything downstream (flattening, scaling,
//! one-hot targets) works off that layout.
//!
//! The crate is split read-leaf first: [`record`] decodes a single record,
//! [`batch`] drains one source file, [`dataset`] aggregates the train/test
//! sources, and [`encode`] projects labels into the one-hot matrix the
//! learner consumes.

pub mod batch;
pub mod dataset;
pub mod encode;
pub mod record;

pub use batch::{Batch, load_batch};
pub use dataset::Dataset;
pub use encode::to_one_hot;
pub use record::{Image, decode_record};

/// Image width in pixels.
pub const IMAGE_WIDTH: usize = 32;
/// Image height in pixels.
pub const IMAGE_HEIGHT: usize = 32;
/// Channels per pixel (blue, green, red after decoding).
pub const CHANNELS: usize = 3;
/// Bytes in one on-disk channel plane.
pub const PLANE_SIZE: usize = IMAGE_WIDTH * IMAGE_HEIGHT;
/// Pixel bytes per image, planar or interleaved.
pub const IMAGE_BYTES: usize = PLANE_SIZE * CHANNELS;
/// On-disk record size: one label byte plus the pixel block.
pub const RECORD_SIZE: usize = IMAGE_BYTES + 1;
/// Nominal record count per source file; files may hold fewer.
pub const RECORDS_PER_BATCH: usize = 10_000;
/// Number of label classes.
pub const NUM_CLASSES: usize = 10;

/// Human-readable class names, indexed by label value.
pub const CLASS_NAMES: [&str; NUM_CLASSES] = [
    "airplane",
    "automobile",
    "bird",
    "cat",
    "deer",
    "dog",
    "frog",
    "horse",
    "ship",
    "truck",
];
