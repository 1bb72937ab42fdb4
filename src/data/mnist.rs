//! MNIST dataset loading from the IDX binary format
//!
//! Parses the four standard MNIST files (images and labels for the train and
//! test splits). Files may be the original `.gz` archives or already
//! decompressed.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use flate2::read::GzDecoder;
use ndarray::Array2;

use super::preprocessing::pixels_to_images;

/// Magic number of an IDX3 image file
const IMAGE_MAGIC: u32 = 2051;
/// Magic number of an IDX1 label file
const LABEL_MAGIC: u32 = 2049;

/// Base names of the MNIST files within a data directory
pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// An MNIST split held in memory
///
/// Images are flattened row-major and normalized to `[-1, 1]` so they match
/// the generator's tanh output range.
#[derive(Debug, Clone)]
pub struct MnistDataset {
    /// Images of shape (num_images, rows * cols)
    pub images: Array2<f32>,
    /// Digit labels (unused by the unconditional GAN, kept for completeness)
    pub labels: Vec<u8>,
    /// Image height in pixels
    pub rows: usize,
    /// Image width in pixels
    pub cols: usize,
}

impl MnistDataset {
    /// Load the training split from a data directory
    pub fn load_train(dir: &Path) -> Result<Self> {
        Self::load_files(&resolve(dir, TRAIN_IMAGES)?, &resolve(dir, TRAIN_LABELS)?)
    }

    /// Load the test split from a data directory
    pub fn load_test(dir: &Path) -> Result<Self> {
        Self::load_files(&resolve(dir, TEST_IMAGES)?, &resolve(dir, TEST_LABELS)?)
    }

    /// Load a split from explicit image and label files
    pub fn load_files(images_path: &Path, labels_path: &Path) -> Result<Self> {
        let (pixels, num_images, rows, cols) = parse_idx_images(&read_maybe_gz(images_path)?)?;
        let labels = parse_idx_labels(&read_maybe_gz(labels_path)?)?;

        if labels.len() != num_images {
            bail!(
                "label count {} does not match image count {}",
                labels.len(),
                num_images
            );
        }

        let images = pixels_to_images(&pixels, num_images, rows * cols)?;

        Ok(Self {
            images,
            labels,
            rows,
            cols,
        })
    }

    /// Number of images in the split
    pub fn len(&self) -> usize {
        self.images.nrows()
    }

    /// Whether the split is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened image size (rows * cols)
    pub fn image_dim(&self) -> usize {
        self.rows * self.cols
    }
}

/// Resolve a base file name inside `dir`, accepting a `.gz` suffix
fn resolve(dir: &Path, name: &str) -> Result<PathBuf> {
    let plain = dir.join(name);
    if plain.exists() {
        return Ok(plain);
    }
    let gz = dir.join(format!("{name}.gz"));
    if gz.exists() {
        return Ok(gz);
    }
    Err(anyhow!(
        "MNIST file {} not found in {} (run the download command first)",
        name,
        dir.display()
    ))
}

/// Read a file, transparently decompressing if it is gzipped
fn read_maybe_gz(path: &Path) -> Result<Vec<u8>> {
    let raw = std::fs::read(path)?;
    if path.extension().map(|e| e == "gz").unwrap_or(false) {
        let mut decoder = GzDecoder::new(raw.as_slice());
        let mut out = Vec::new();
        decoder.read_to_end(&mut out)?;
        Ok(out)
    } else {
        Ok(raw)
    }
}

/// Parse an IDX3 image file
///
/// Layout: u32 magic (2051), u32 count, u32 rows, u32 cols, then
/// `count * rows * cols` unsigned bytes, all big-endian.
///
/// # Returns
///
/// Tuple of (raw pixels, num_images, rows, cols)
fn parse_idx_images(bytes: &[u8]) -> Result<(Vec<u8>, usize, usize, usize)> {
    if bytes.len() < 16 {
        bail!("IDX image file truncated: {} bytes", bytes.len());
    }

    let magic = read_be_u32(bytes, 0);
    if magic != IMAGE_MAGIC {
        bail!("bad IDX image magic: expected {IMAGE_MAGIC}, got {magic}");
    }

    let num_images = read_be_u32(bytes, 4) as usize;
    let rows = read_be_u32(bytes, 8) as usize;
    let cols = read_be_u32(bytes, 12) as usize;

    // Header values come from outside; do not trust them to multiply
    let expected = num_images
        .checked_mul(rows)
        .and_then(|v| v.checked_mul(cols))
        .ok_or_else(|| {
            anyhow!("IDX header dimensions overflow: {num_images} x {rows} x {cols}")
        })?;
    let payload = &bytes[16..];
    if payload.len() != expected {
        bail!(
            "IDX image payload is {} bytes, expected {}",
            payload.len(),
            expected
        );
    }

    Ok((payload.to_vec(), num_images, rows, cols))
}

/// Parse an IDX1 label file
///
/// Layout: u32 magic (2049), u32 count, then `count` unsigned bytes.
fn parse_idx_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < 8 {
        bail!("IDX label file truncated: {} bytes", bytes.len());
    }

    let magic = read_be_u32(bytes, 0);
    if magic != LABEL_MAGIC {
        bail!("bad IDX label magic: expected {LABEL_MAGIC}, got {magic}");
    }

    let count = read_be_u32(bytes, 4) as usize;
    let payload = &bytes[8..];
    if payload.len() != count {
        bail!("IDX label payload is {} bytes, expected {}", payload.len(), count);
    }

    Ok(payload.to_vec())
}

fn read_be_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
