//! Utility module with helper functions
//!
//! This module provides:
//! - Configuration handling
//! - Checkpoint save/load utilities
//! - Sample image grid rendering

mod checkpoint;
mod config;
pub mod images;

pub use checkpoint::{find_latest_checkpoint, list_checkpoints, load_checkpoint, save_checkpoint};
pub use config::{ensure_config_exists, Config};
pub use images::save_image_grid;
