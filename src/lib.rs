//! # Vanilla GAN for MNIST
//!
//! This crate implements the textbook generative adversarial network on the
//! MNIST handwritten-digit dataset: two small fully-connected networks trained
//! in opposition, with periodic sample-image dumps.
//!
//! ## Modules
//!
//! - `data`: MNIST download, IDX parsing, normalization and batching
//! - `model`: Generator and Discriminator networks
//! - `training`: Training loop and loss functions
//! - `utils`: Configuration, checkpoints and image grids

pub mod data;
pub mod model;
pub mod training;
pub mod utils;

pub use data::{DataLoader, MnistDataset, MnistDownloader};
pub use data::{denormalize_pixel, normalize_pixels};
pub use model::{Discriminator, Gan, Generator};
pub use training::{Trainer, TrainingConfig, TrainingMetrics};
pub use utils::{load_checkpoint, save_checkpoint, save_image_grid, Config};
