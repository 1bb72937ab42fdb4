//! Model module containing GAN architecture components
//!
//! This module provides:
//! - Generator network mapping noise to synthetic digit images
//! - Discriminator network distinguishing real from fake
//! - Gan wrapper combining both networks

mod discriminator;
mod gan;
mod generator;

pub use discriminator::{Discriminator, DiscriminatorConfig};
pub use gan::Gan;
pub use generator::{Generator, GeneratorConfig};

use tch::Tensor;

/// Negative slope used by both networks (the usual GAN setting)
pub(crate) const LEAKY_SLOPE: f64 = 0.2;

/// LeakyReLU with an explicit negative slope
///
/// The safe tch wrapper bakes in the 0.01 default, so express the activation
/// as max(x, slope * x).
pub(crate) fn leaky_relu(xs: &Tensor, slope: f64) -> Tensor {
    xs.maximum(&(xs * slope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::Device;

    #[test]
    fn test_leaky_relu_slope() {
        let xs = Tensor::from_slice(&[-1.0f32, 0.0, 2.0]).to_device(Device::Cpu);
        let out = leaky_relu(&xs, 0.2);

        let values: Vec<f32> = (&out).try_into().unwrap();
        assert!((values[0] - (-0.2)).abs() < 1e-6);
        assert!(values[1].abs() < 1e-6);
        assert!((values[2] - 2.0).abs() < 1e-6);
    }
}
