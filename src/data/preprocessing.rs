//! Pixel preprocessing for GAN training
//!
//! The generator ends in a tanh, so real images must live in the same
//! `[-1, 1]` range. These helpers map raw MNIST bytes into that range and
//! back out again for rendering.

use anyhow::{bail, Result};
use ndarray::Array2;

/// Normalize raw `[0, 255]` pixel bytes to `[-1, 1]`
///
/// Formula: x_norm = 2 * (x / 255) - 1
pub fn normalize_pixels(pixels: &[u8]) -> Vec<f32> {
    pixels
        .iter()
        .map(|&p| 2.0 * (p as f32 / 255.0) - 1.0)
        .collect()
}

/// Map a normalized `[-1, 1]` value back to a `[0, 255]` pixel byte
///
/// Values outside the range (float error can push the tanh output slightly
/// past it) are clamped.
pub fn denormalize_pixel(value: f32) -> u8 {
    let scaled = (value + 1.0) / 2.0 * 255.0;
    scaled.round().clamp(0.0, 255.0) as u8
}

/// Convert raw pixel bytes into a normalized image matrix
///
/// # Arguments
///
/// * `pixels` - Raw bytes, `num_images * image_dim` long
/// * `num_images` - Number of images
/// * `image_dim` - Flattened pixels per image (rows * cols)
///
/// # Returns
///
/// Array of shape (num_images, image_dim) with values in `[-1, 1]`
pub fn pixels_to_images(pixels: &[u8], num_images: usize, image_dim: usize) -> Result<Array2<f32>> {
    if pixels.len() != num_images * image_dim {
        bail!(
            "pixel buffer is {} bytes, expected {} ({} images x {} pixels)",
            pixels.len(),
            num_images * image_dim,
            num_images,
            image_dim
        );
    }

    let normalized = normalize_pixels(pixels);
    Ok(Array2::from_shape_vec((num_images, image_dim), normalized)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_range() {
        let normalized = normalize_pixels(&[0, 128, 255]);

        assert!((normalized[0] - (-1.0)).abs() < 1e-6);
        assert!(normalized[1].abs() < 0.01);
        assert!((normalized[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_denormalize_roundtrip() {
        for p in [0u8, 1, 17, 127, 200, 255] {
            let normalized = normalize_pixels(&[p]);
            assert_eq!(denormalize_pixel(normalized[0]), p);
        }
    }

    #[test]
    fn test_denormalize_clamps() {
        assert_eq!(denormalize_pixel(-1.5), 0);
        assert_eq!(denormalize_pixel(1.5), 255);
    }

    #[test]
    fn test_pixels_to_images_shape() {
        let pixels = vec![0u8; 6];
        let images = pixels_to_images(&pixels, 2, 3).unwrap();
        assert_eq!(images.shape(), &[2, 3]);
    }

    #[test]
    fn test_pixels_to_images_bad_length() {
        let pixels = vec![0u8; 5];
        assert!(pixels_to_images(&pixels, 2, 3).is_err());
    }
}
