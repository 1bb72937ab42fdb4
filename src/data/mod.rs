//! Data module for downloading and preprocessing MNIST
//!
//! This module provides:
//! - HTTP downloader for the MNIST archive files
//! - IDX binary format parsing
//! - Pixel normalization to the tanh range
//! - DataLoader for batching flattened images

mod download;
mod loader;
mod mnist;
mod preprocessing;

pub use download::MnistDownloader;
pub use loader::DataLoader;
pub use mnist::MnistDataset;
pub use preprocessing::{denormalize_pixel, normalize_pixels, pixels_to_images};
