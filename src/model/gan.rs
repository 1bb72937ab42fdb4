//! GAN wrapper combining Generator and Discriminator
//!
//! Provides convenient methods for training and generation.

use tch::{nn, nn::OptimizerConfig, nn::VarStore, Device, Tensor};

use super::discriminator::{Discriminator, DiscriminatorConfig};
use super::generator::{Generator, GeneratorConfig};

/// Complete GAN model
pub struct Gan {
    /// Generator network
    pub generator: Generator,
    /// Discriminator network
    pub discriminator: Discriminator,
    /// Variable store for generator
    pub gen_vs: VarStore,
    /// Variable store for discriminator
    pub disc_vs: VarStore,
    /// Device (CPU/GPU)
    pub device: Device,
}

impl Gan {
    /// Create a new GAN model
    ///
    /// # Arguments
    ///
    /// * `gen_config` - Generator configuration
    /// * `disc_config` - Discriminator configuration
    /// * `device` - Device to create model on
    pub fn new(gen_config: GeneratorConfig, disc_config: DiscriminatorConfig, device: Device) -> Self {
        let gen_vs = VarStore::new(device);
        let disc_vs = VarStore::new(device);

        let generator = Generator::new(&gen_vs.root(), gen_config);
        let discriminator = Discriminator::new(&disc_vs.root(), disc_config);

        Self {
            generator,
            discriminator,
            gen_vs,
            disc_vs,
            device,
        }
    }

    /// Create a GAN with default widths for the given image and latent sizes
    ///
    /// # Arguments
    ///
    /// * `latent_dim` - Size of latent noise vector
    /// * `image_dim` - Flattened image size (28 * 28 for MNIST)
    /// * `device` - Device to create model on
    pub fn with_defaults(latent_dim: i64, image_dim: i64, device: Device) -> Self {
        let gen_config = GeneratorConfig {
            latent_dim,
            image_dim,
            ..Default::default()
        };

        let disc_config = DiscriminatorConfig {
            image_dim,
            ..Default::default()
        };

        Self::new(gen_config, disc_config, device)
    }

    /// Sample a batch of latent noise vectors
    pub fn sample_noise(&self, num_samples: i64) -> Tensor {
        Tensor::randn(
            [num_samples, self.latent_dim()],
            (tch::Kind::Float, self.device),
        )
    }

    /// Generate synthetic images
    ///
    /// # Arguments
    ///
    /// * `num_samples` - Number of images to generate
    ///
    /// # Returns
    ///
    /// Tensor of shape (num_samples, image_dim)
    pub fn generate(&self, num_samples: i64) -> Tensor {
        let noise = self.sample_noise(num_samples);
        self.generator.generate(&noise)
    }

    /// Generate images from specific noise vectors
    pub fn generate_from_noise(&self, noise: &Tensor) -> Tensor {
        self.generator.generate(noise)
    }

    /// Discriminate images (get probability of being real)
    pub fn discriminate(&self, images: &Tensor) -> Tensor {
        self.discriminator.classify(images)
    }

    /// Get generator optimizer (Adam with the standard GAN betas)
    pub fn gen_optimizer(&self, lr: f64) -> anyhow::Result<nn::Optimizer> {
        let opt = nn::Adam {
            beta1: 0.5,
            beta2: 0.999,
            ..Default::default()
        }
        .build(&self.gen_vs, lr)?;
        Ok(opt)
    }

    /// Get discriminator optimizer (Adam with the standard GAN betas)
    pub fn disc_optimizer(&self, lr: f64) -> anyhow::Result<nn::Optimizer> {
        let opt = nn::Adam {
            beta1: 0.5,
            beta2: 0.999,
            ..Default::default()
        }
        .build(&self.disc_vs, lr)?;
        Ok(opt)
    }

    /// Save model weights
    pub fn save(&self, gen_path: &str, disc_path: &str) -> anyhow::Result<()> {
        self.gen_vs.save(gen_path)?;
        self.disc_vs.save(disc_path)?;
        Ok(())
    }

    /// Load model weights
    pub fn load(&mut self, gen_path: &str, disc_path: &str) -> anyhow::Result<()> {
        self.gen_vs.load(gen_path)?;
        self.disc_vs.load(disc_path)?;
        Ok(())
    }

    /// Get latent dimension
    pub fn latent_dim(&self) -> i64 {
        self.generator.config().latent_dim
    }

    /// Get flattened image dimension
    pub fn image_dim(&self) -> i64 {
        self.generator.config().image_dim
    }

    /// Interpolate between two points in latent space
    ///
    /// Useful for visualizing smooth transitions between generated digits
    ///
    /// # Arguments
    ///
    /// * `z1` - First latent vector
    /// * `z2` - Second latent vector
    /// * `steps` - Number of interpolation steps
    ///
    /// # Returns
    ///
    /// Tensor of shape (steps, image_dim)
    pub fn interpolate(&self, z1: &Tensor, z2: &Tensor, steps: i64) -> anyhow::Result<Tensor> {
        if steps < 1 {
            anyhow::bail!("interpolation needs at least one step, got {}", steps);
        }
        if steps == 1 {
            return Ok(self.generator.generate(&z1.unsqueeze(0)));
        }

        let mut samples = Vec::new();

        for i in 0..steps {
            let alpha = i as f64 / (steps - 1) as f64;
            let z = z1 * (1.0 - alpha) + z2 * alpha;
            let sample = self.generator.generate(&z.unsqueeze(0));
            samples.push(sample.squeeze_dim(0));
        }

        Ok(Tensor::stack(&samples, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gan_creation() {
        let gan = Gan::with_defaults(100, 784, Device::Cpu);

        assert_eq!(gan.latent_dim(), 100);
        assert_eq!(gan.image_dim(), 784);
    }

    #[test]
    fn test_gan_generate() {
        let gan = Gan::with_defaults(100, 784, Device::Cpu);

        let samples = gan.generate(4);
        assert_eq!(samples.size(), vec![4, 784]);
    }

    #[test]
    fn test_gan_discriminate() {
        let gan = Gan::with_defaults(100, 784, Device::Cpu);

        let images = Tensor::randn([4, 784], (tch::Kind::Float, Device::Cpu));
        let probs = gan.discriminate(&images);

        assert_eq!(probs.size(), vec![4, 1]);
    }

    #[test]
    fn test_gan_interpolate() {
        let gan = Gan::with_defaults(100, 784, Device::Cpu);

        let z1 = Tensor::randn([100], (tch::Kind::Float, Device::Cpu));
        let z2 = Tensor::randn([100], (tch::Kind::Float, Device::Cpu));

        let interpolated = gan.interpolate(&z1, &z2, 10).unwrap();
        assert_eq!(interpolated.size(), vec![10, 784]);
    }

    #[test]
    fn test_gan_interpolate_degenerate_steps() {
        let gan = Gan::with_defaults(16, 64, Device::Cpu);

        let z1 = Tensor::randn([16], (tch::Kind::Float, Device::Cpu));
        let z2 = Tensor::randn([16], (tch::Kind::Float, Device::Cpu));

        assert!(gan.interpolate(&z1, &z2, 0).is_err());

        // A single step is just the first endpoint, no NaN latents
        let single = gan.interpolate(&z1, &z2, 1).unwrap();
        assert_eq!(single.size(), vec![1, 64]);
        let expected = gan.generator.generate(&z1.unsqueeze(0));
        let diff: f64 = (&single - &expected).abs().max().double_value(&[]);
        assert!(diff < 1e-6);
    }

    #[test]
    fn test_gan_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let gen_path = dir.path().join("generator.pt");
        let disc_path = dir.path().join("discriminator.pt");

        let gan = Gan::with_defaults(100, 784, Device::Cpu);
        gan.save(gen_path.to_str().unwrap(), disc_path.to_str().unwrap())
            .unwrap();

        let mut other = Gan::with_defaults(100, 784, Device::Cpu);
        other
            .load(gen_path.to_str().unwrap(), disc_path.to_str().unwrap())
            .unwrap();

        // Same weights produce the same output for the same noise
        let noise = Tensor::randn([2, 100], (tch::Kind::Float, Device::Cpu));
        let a = gan.generate_from_noise(&noise);
        let b = other.generate_from_noise(&noise);
        let diff: f64 = (&a - &b).abs().max().double_value(&[]);
        assert!(diff < 1e-6);
    }
}
