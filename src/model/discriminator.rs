//! Discriminator network for the vanilla GAN
//!
//! The Discriminator classifies flattened digit images as real or fake.
//! Architecture is a narrowing stack of fully-connected layers with dropout.

use tch::{nn, nn::Module, nn::ModuleT, Tensor};

use super::{leaky_relu, LEAKY_SLOPE};

/// Discriminator network configuration
#[derive(Debug, Clone)]
pub struct DiscriminatorConfig {
    /// Flattened input image size (28 * 28 for MNIST)
    pub image_dim: i64,
    /// Width of the narrowest hidden layer; the first is twice as wide
    pub base_width: i64,
    /// Dropout rate between hidden layers
    pub dropout: f64,
}

impl Default for DiscriminatorConfig {
    fn default() -> Self {
        Self {
            image_dim: 28 * 28,
            base_width: 256,
            dropout: 0.3,
        }
    }
}

/// Discriminator network
///
/// Architecture:
/// 1. Linear image_dim -> base_width * 2, LeakyReLU, Dropout
/// 2. Linear base_width * 2 -> base_width, LeakyReLU, Dropout
/// 3. Linear base_width -> 1 (logit, no sigmoid)
#[derive(Debug)]
pub struct Discriminator {
    config: DiscriminatorConfig,
    fc1: nn::Linear,
    fc2: nn::Linear,
    fc3: nn::Linear,
}

impl Discriminator {
    /// Create a new Discriminator network
    pub fn new(vs: &nn::Path, config: DiscriminatorConfig) -> Self {
        let base = config.base_width;

        let fc1 = nn::linear(vs / "fc1", config.image_dim, base * 2, Default::default());
        let fc2 = nn::linear(vs / "fc2", base * 2, base, Default::default());
        let fc3 = nn::linear(vs / "fc3", base, 1, Default::default());

        Self {
            config,
            fc1,
            fc2,
            fc3,
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    ///
    /// * `input` - Tensor of shape (batch_size, image_dim)
    /// * `train` - Whether in training mode (affects dropout)
    ///
    /// # Returns
    ///
    /// Tensor of shape (batch_size, 1) with logits (not sigmoid)
    pub fn forward_t(&self, input: &Tensor, train: bool) -> Tensor {
        let x = leaky_relu(&self.fc1.forward(input), LEAKY_SLOPE);
        let x = x.dropout(self.config.dropout, train);

        let x = leaky_relu(&self.fc2.forward(&x), LEAKY_SLOPE);
        let x = x.dropout(self.config.dropout, train);

        self.fc3.forward(&x)
    }

    /// Classify images (inference mode)
    ///
    /// Returns probability of being real (after sigmoid)
    pub fn classify(&self, input: &Tensor) -> Tensor {
        self.forward_t(input, false).sigmoid()
    }

    /// Get configuration
    pub fn config(&self) -> &DiscriminatorConfig {
        &self.config
    }
}

impl ModuleT for Discriminator {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        Discriminator::forward_t(self, xs, train)
    }
}
