//! Generator network for the vanilla GAN
//!
//! The Generator transforms random noise vectors into flattened digit images.
//! Architecture is a fixed-width stack of fully-connected layers ending in a
//! tanh, so outputs land in `[-1, 1]` like the normalized training images.

use tch::{nn, nn::Module, nn::ModuleT, Device, Tensor};

use super::{leaky_relu, LEAKY_SLOPE};

/// Generator network configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Size of the latent noise vector
    pub latent_dim: i64,
    /// Flattened output image size (28 * 28 for MNIST)
    pub image_dim: i64,
    /// Width of the first hidden layer; later layers double from it
    pub base_width: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            latent_dim: 100,
            image_dim: 28 * 28,
            base_width: 256,
        }
    }
}

/// Generator network
///
/// Architecture:
/// 1. Linear latent_dim -> base_width, LeakyReLU
/// 2. Linear base_width -> base_width * 2, LeakyReLU
/// 3. Linear base_width * 2 -> base_width * 4, LeakyReLU
/// 4. Linear base_width * 4 -> image_dim, Tanh
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    fc1: nn::Linear,
    fc2: nn::Linear,
    fc3: nn::Linear,
    fc4: nn::Linear,
}

impl Generator {
    /// Create a new Generator network
    pub fn new(vs: &nn::Path, config: GeneratorConfig) -> Self {
        let base = config.base_width;

        let fc1 = nn::linear(vs / "fc1", config.latent_dim, base, Default::default());
        let fc2 = nn::linear(vs / "fc2", base, base * 2, Default::default());
        let fc3 = nn::linear(vs / "fc3", base * 2, base * 4, Default::default());
        let fc4 = nn::linear(vs / "fc4", base * 4, config.image_dim, Default::default());

        Self {
            config,
            fc1,
            fc2,
            fc3,
            fc4,
        }
    }

    /// Generate synthetic images from noise
    ///
    /// # Arguments
    ///
    /// * `noise` - Tensor of shape (batch_size, latent_dim)
    ///
    /// # Returns
    ///
    /// Tensor of shape (batch_size, image_dim) with values in `[-1, 1]`
    pub fn forward_t(&self, noise: &Tensor, _train: bool) -> Tensor {
        let x = leaky_relu(&self.fc1.forward(noise), LEAKY_SLOPE);
        let x = leaky_relu(&self.fc2.forward(&x), LEAKY_SLOPE);
        let x = leaky_relu(&self.fc3.forward(&x), LEAKY_SLOPE);
        self.fc4.forward(&x).tanh()
    }

    /// Generate images (inference mode)
    pub fn generate(&self, noise: &Tensor) -> Tensor {
        self.forward_t(noise, false)
    }

    /// Generate images from fresh random noise
    ///
    /// # Arguments
    ///
    /// * `num_samples` - Number of images to generate
    /// * `device` - Device to create tensors on
    pub fn generate_random(&self, num_samples: i64, device: Device) -> Tensor {
        let noise = Tensor::randn(
            [num_samples, self.config.latent_dim],
            (tch::Kind::Float, device),
        );
        self.generate(&noise)
    }

    /// Get configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl ModuleT for Generator {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        Generator::forward_t(self, xs, train)
    }
}
