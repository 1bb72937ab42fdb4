//! Configuration management
//!
//! Provides unified configuration for the entire GAN pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::{DiscriminatorConfig, GeneratorConfig};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data configuration
    pub data: DataConfig,
    /// Model configuration
    pub model: ModelConfig,
    /// Training configuration
    pub training: TrainingConfigFile,
}

/// Data-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the MNIST files
    pub data_dir: String,
    /// Mirror URL for downloading the archives
    pub mirror: String,
    /// Batch size
    pub batch_size: usize,
}

/// Model-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Latent dimension size
    pub latent_dim: i64,
    /// Flattened image size (28 * 28 for MNIST)
    pub image_dim: i64,
    /// Base hidden width for generator
    pub gen_base_width: i64,
    /// Base hidden width for discriminator
    pub disc_base_width: i64,
    /// Dropout rate for discriminator
    pub dropout: f64,
}

/// Training-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfigFile {
    /// Number of epochs
    pub epochs: usize,
    /// Generator learning rate
    pub gen_lr: f64,
    /// Discriminator learning rate
    pub disc_lr: f64,
    /// Discriminator steps per generator step
    pub disc_steps: usize,
    /// Checkpoint save frequency
    pub checkpoint_every: usize,
    /// Checkpoint directory
    pub checkpoint_dir: String,
    /// Sample grid save frequency
    pub sample_every: usize,
    /// Sample grid directory
    pub sample_dir: String,
    /// Rows in the sample grid
    pub sample_rows: usize,
    /// Columns in the sample grid
    pub sample_cols: usize,
    /// Use label smoothing
    pub label_smoothing: bool,
    /// Device: "cpu" or "cuda"
    pub device: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                data_dir: "data".to_string(),
                mirror: "https://storage.googleapis.com/cvdf-datasets/mnist".to_string(),
                batch_size: 64,
            },
            model: ModelConfig {
                latent_dim: 100,
                image_dim: 28 * 28,
                gen_base_width: 256,
                disc_base_width: 256,
                dropout: 0.3,
            },
            training: TrainingConfigFile {
                epochs: 100,
                gen_lr: 2e-4,
                disc_lr: 2e-4,
                disc_steps: 1,
                checkpoint_every: 10,
                checkpoint_dir: "checkpoints".to_string(),
                sample_every: 5,
                sample_dir: "samples".to_string(),
                sample_rows: 8,
                sample_cols: 8,
                label_smoothing: false,
                device: "cpu".to_string(),
            },
        }
    }
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_toml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_toml(&self, path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn save_json(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build network configurations for a given flattened image size
    ///
    /// The image size comes from the loaded dataset (or the configured
    /// `image_dim` when no dataset is at hand); widths and dropout come from
    /// the `[model]` section.
    pub fn network_configs(&self, image_dim: i64) -> (GeneratorConfig, DiscriminatorConfig) {
        let gen = GeneratorConfig {
            latent_dim: self.model.latent_dim,
            image_dim,
            base_width: self.model.gen_base_width,
        };
        let disc = DiscriminatorConfig {
            image_dim,
            base_width: self.model.disc_base_width,
            dropout: self.model.dropout,
        };
        (gen, disc)
    }

    /// Get device from configuration
    pub fn get_device(&self) -> tch::Device {
        match self.training.device.to_lowercase().as_str() {
            "cuda" | "gpu" => {
                if tch::Cuda::is_available() {
                    tch::Device::Cuda(0)
                } else {
                    tracing::warn!("CUDA requested but not available, falling back to CPU");
                    tch::Device::Cpu
                }
            }
            _ => tch::Device::Cpu,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.data.batch_size == 0 {
            anyhow::bail!("Batch size must be > 0");
        }
        if self.model.latent_dim <= 0 {
            anyhow::bail!("Latent dimension must be > 0");
        }
        if self.model.image_dim <= 0 {
            anyhow::bail!("Image dimension must be > 0");
        }
        if self.training.epochs == 0 {
            anyhow::bail!("Number of epochs must be > 0");
        }
        if self.training.sample_rows == 0 || self.training.sample_cols == 0 {
            anyhow::bail!("Sample grid must have at least one row and column");
        }
        if self.training.checkpoint_every == 0 || self.training.sample_every == 0 {
            anyhow::bail!("Checkpoint and sample frequencies must be > 0");
        }
        Ok(())
    }
}

/// Create default configuration file if it doesn't exist
pub fn ensure_config_exists(path: &str) -> anyhow::Result<Config> {
    if Path::new(path).exists() {
        if path.ends_with(".toml") {
            Config::from_toml(path)
        } else {
            Config::from_json(path)
        }
    } else {
        let config = Config::default();
        if path.ends_with(".toml") {
            config.save_toml(path)?;
        } else {
            config.save_json(path)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.model.latent_dim, 100);
        assert_eq!(config.model.image_dim, 784);
        assert_eq!(config.data.batch_size, 64);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let loaded: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.data.data_dir, loaded.data.data_dir);
        assert_eq!(config.model.latent_dim, loaded.model.latent_dim);
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let loaded: Config = toml::from_str(&text).unwrap();

        assert_eq!(config.training.epochs, loaded.training.epochs);
        assert_eq!(config.training.sample_dir, loaded.training.sample_dir);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.data.batch_size = 0;
        assert!(config.validate().is_err());

        config.data.batch_size = 64;
        config.model.latent_dim = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_network_configs_carry_model_settings() {
        let mut config = Config::default();
        config.model.latent_dim = 32;
        config.model.gen_base_width = 64;
        config.model.disc_base_width = 48;
        config.model.dropout = 0.5;

        let (gen, disc) = config.network_configs(196);

        assert_eq!(gen.latent_dim, 32);
        assert_eq!(gen.image_dim, 196);
        assert_eq!(gen.base_width, 64);
        assert_eq!(disc.image_dim, 196);
        assert_eq!(disc.base_width, 48);
        assert!((disc.dropout - 0.5).abs() < 1e-9);

        // Non-default widths really change the built networks
        use tch::{nn::VarStore, Device};
        let vs = VarStore::new(Device::Cpu);
        let _ = crate::model::Generator::new(&vs.root(), gen);
        let shapes: Vec<Vec<i64>> = vs.trainable_variables().iter().map(|t| t.size()).collect();
        assert!(shapes.contains(&vec![64, 32]));
    }

    #[test]
    fn test_ensure_config_exists_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path_str = path.to_str().unwrap();

        let config = ensure_config_exists(path_str).unwrap();
        assert!(path.exists());
        assert_eq!(config.model.latent_dim, 100);

        // A second call reads the existing file
        let again = ensure_config_exists(path_str).unwrap();
        assert_eq!(again.data.batch_size, config.data.batch_size);
    }
}
