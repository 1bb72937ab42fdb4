//! Sample image grid rendering
//!
//! Converts a batch of generated images into a single grayscale PNG grid so
//! training progress can be inspected at a glance.

use anyhow::{bail, Result};
use image::GrayImage;
use tch::Tensor;

use crate::data::denormalize_pixel;

/// Grid layout configuration
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub cols: usize,
    /// Side length of each (square) image in pixels
    pub image_size: usize,
    /// Padding between cells in pixels
    pub padding: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            image_size: 28,
            padding: 2,
        }
    }
}

impl GridConfig {
    /// Number of cells in the grid
    pub fn num_cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Total grid width in pixels
    pub fn width(&self) -> u32 {
        (self.cols * (self.image_size + self.padding) + self.padding) as u32
    }

    /// Total grid height in pixels
    pub fn height(&self) -> u32 {
        (self.rows * (self.image_size + self.padding) + self.padding) as u32
    }
}

/// Render a batch of generated images into a grayscale grid
///
/// # Arguments
///
/// * `samples` - Tensor of shape (n, image_size * image_size) in `[-1, 1]`
/// * `config` - Grid layout
///
/// # Returns
///
/// Grayscale image with up to `rows * cols` cells; extra samples are ignored
/// and missing cells stay black.
pub fn tensor_to_grid(samples: &Tensor, config: &GridConfig) -> Result<GrayImage> {
    let size = samples.size();
    if size.len() != 2 {
        bail!("expected a 2D sample tensor, got shape {:?}", size);
    }

    let image_dim = (config.image_size * config.image_size) as i64;
    if size[1] != image_dim {
        bail!(
            "sample tensor has {} pixels per image, grid expects {}",
            size[1],
            image_dim
        );
    }

    let flat: Vec<f32> = samples.flatten(0, -1).try_into()?;
    let num_samples = size[0] as usize;

    let mut grid = GrayImage::new(config.width(), config.height());

    for cell in 0..config.num_cells().min(num_samples) {
        let row = cell / config.cols;
        let col = cell % config.cols;
        let x0 = (col * (config.image_size + config.padding) + config.padding) as u32;
        let y0 = (row * (config.image_size + config.padding) + config.padding) as u32;

        let base = cell * config.image_size * config.image_size;
        for py in 0..config.image_size {
            for px in 0..config.image_size {
                let value = flat[base + py * config.image_size + px];
                let pixel = denormalize_pixel(value);
                grid.put_pixel(x0 + px as u32, y0 + py as u32, image::Luma([pixel]));
            }
        }
    }

    Ok(grid)
}

/// Render and save a sample grid as a PNG file
///
/// Creates the parent directory if needed.
pub fn save_image_grid(samples: &Tensor, path: &str, config: &GridConfig) -> Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let grid = tensor_to_grid(samples, config)?;
    grid.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::Device;

    #[test]
    fn test_grid_dimensions() {
        let config = GridConfig {
            rows: 2,
            cols: 3,
            image_size: 4,
            padding: 1,
        };

        assert_eq!(config.num_cells(), 6);
        assert_eq!(config.width(), 16); // 3 * (4 + 1) + 1
        assert_eq!(config.height(), 11); // 2 * (4 + 1) + 1
    }

    #[test]
    fn test_tensor_to_grid_pixels() {
        let config = GridConfig {
            rows: 1,
            cols: 2,
            image_size: 2,
            padding: 0,
        };

        // First image all white (1.0), second all black (-1.0)
        let white = Tensor::ones([1, 4], (tch::Kind::Float, Device::Cpu));
        let black = white.neg();
        let samples = Tensor::cat(&[white, black], 0);

        let grid = tensor_to_grid(&samples, &config).unwrap();

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get_pixel(0, 0).0[0], 255);
        assert_eq!(grid.get_pixel(2, 0).0[0], 0);
    }

    #[test]
    fn test_tensor_to_grid_rejects_wrong_dim() {
        let config = GridConfig::default();
        let samples = Tensor::zeros([2, 100], (tch::Kind::Float, Device::Cpu));
        assert!(tensor_to_grid(&samples, &config).is_err());
    }

    #[test]
    fn test_save_image_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("grid.png");

        let config = GridConfig {
            rows: 2,
            cols: 2,
            image_size: 28,
            padding: 2,
        };
        let samples = Tensor::zeros([4, 784], (tch::Kind::Float, Device::Cpu));

        save_image_grid(&samples, path.to_str().unwrap(), &config).unwrap();
        assert!(path.exists());
    }
}
