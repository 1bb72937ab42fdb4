//! Training loop implementation for the vanilla GAN
//!
//! Provides the main training loop with alternating updates for generator and
//! discriminator, periodic sample-image grids and checkpoints.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tch::{nn, Device, Tensor};
use tracing::{info, warn};

use super::losses::{discriminator_loss, discriminator_loss_smoothed, generator_loss};
use super::metrics::TrainingMetrics;
use crate::data::DataLoader;
use crate::model::Gan;
use crate::utils::images::GridConfig;
use crate::utils::{save_checkpoint, save_image_grid};

/// Training configuration
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Total number of training epochs, including any already-completed
    /// epochs when resuming from a checkpoint
    pub epochs: usize,
    /// Learning rate for generator
    pub gen_lr: f64,
    /// Learning rate for discriminator
    pub disc_lr: f64,
    /// Number of discriminator updates per generator update
    pub disc_steps: usize,
    /// Save checkpoint every N epochs
    pub checkpoint_every: usize,
    /// Directory to save checkpoints
    pub checkpoint_dir: String,
    /// Save a sample image grid every N epochs
    pub sample_every: usize,
    /// Directory to save sample grids
    pub sample_dir: String,
    /// Rows in the sample grid
    pub sample_rows: usize,
    /// Columns in the sample grid
    pub sample_cols: usize,
    /// Whether to use label smoothing
    pub label_smoothing: bool,
    /// Smooth label for real images (e.g., 0.9)
    pub smooth_real: f64,
    /// Smooth label for fake images (e.g., 0.1)
    pub smooth_fake: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
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
            smooth_real: 0.9,
            smooth_fake: 0.1,
        }
    }
}

/// GAN Trainer
pub struct Trainer {
    config: TrainingConfig,
    device: Device,
    metrics: TrainingMetrics,
    start_epoch: usize,
}

impl Trainer {
    /// Create a new trainer
    pub fn new(config: TrainingConfig, device: Device) -> Self {
        Self {
            config,
            device,
            metrics: TrainingMetrics::new(),
            start_epoch: 0,
        }
    }

    /// Continue from a loaded checkpoint
    ///
    /// Seeds the metrics history and shifts epoch numbering so checkpoints,
    /// sample grids and the metrics CSV pick up where the earlier run left
    /// off instead of overwriting it.
    pub fn resume_from(&mut self, epoch: usize, metrics: TrainingMetrics) {
        self.start_epoch = epoch;
        self.metrics = metrics;
    }

    /// Train the GAN
    ///
    /// # Arguments
    ///
    /// * `model` - GAN model to train
    /// * `data_loader` - DataLoader providing batches of real images
    ///
    /// # Returns
    ///
    /// Training metrics
    pub fn train(&mut self, model: &mut Gan, data_loader: &mut DataLoader) -> Result<&TrainingMetrics> {
        let mut gen_opt = model.gen_optimizer(self.config.gen_lr)?;
        let mut disc_opt = model.disc_optimizer(self.config.disc_lr)?;

        let latent_dim = model.latent_dim();
        let num_batches = data_loader.num_batches();

        if self.start_epoch >= self.config.epochs {
            warn!(
                "Checkpoint already at epoch {} of {}, nothing to train",
                self.start_epoch, self.config.epochs
            );
        }

        info!(
            "Training epochs {}..{}, {} batches per epoch",
            self.start_epoch + 1,
            self.config.epochs,
            num_batches
        );

        std::fs::create_dir_all(&self.config.checkpoint_dir)?;
        std::fs::create_dir_all(&self.config.sample_dir)?;

        // Fixed noise so sample grids are comparable across epochs
        let num_grid = (self.config.sample_rows * self.config.sample_cols) as i64;
        let fixed_noise = Tensor::randn([num_grid, latent_dim], (tch::Kind::Float, self.device));

        for epoch in self.start_epoch..self.config.epochs {
            let mut epoch_gen_loss = 0.0;
            let mut epoch_disc_loss = 0.0;
            let mut epoch_real_acc = 0.0;
            let mut epoch_fake_acc = 0.0;
            let mut batch_count = 0;

            // Progress bar for epoch
            let pb = ProgressBar::new(num_batches as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
                    .progress_chars("##-"),
            );

            // Iterate over batches
            for real_batch in data_loader.iter() {
                let batch_size = real_batch.shape()[0] as i64;

                // Convert to tensor on device
                let real_images = Tensor::try_from(real_batch)?.to_device(self.device);

                // ========== Train Discriminator ==========
                for _ in 0..self.config.disc_steps {
                    // Generate fake images
                    let noise =
                        Tensor::randn([batch_size, latent_dim], (tch::Kind::Float, self.device));
                    let fake_images = model.generator.forward_t(&noise, true);

                    // Discriminator predictions
                    let real_output = model.discriminator.forward_t(&real_images, true);
                    let fake_output = model.discriminator.forward_t(&fake_images.detach(), true);

                    // Calculate discriminator loss
                    let d_loss = if self.config.label_smoothing {
                        discriminator_loss_smoothed(
                            &real_output,
                            &fake_output,
                            self.config.smooth_real,
                            self.config.smooth_fake,
                        )
                    } else {
                        discriminator_loss(&real_output, &fake_output)
                    };

                    // Update discriminator
                    disc_opt.zero_grad();
                    d_loss.backward();
                    disc_opt.step();

                    epoch_disc_loss += d_loss.double_value(&[]);

                    // Calculate accuracies
                    let real_acc = real_output
                        .sigmoid()
                        .ge(0.5)
                        .to_kind(tch::Kind::Float)
                        .mean(tch::Kind::Float);
                    let fake_acc = fake_output
                        .sigmoid()
                        .lt(0.5)
                        .to_kind(tch::Kind::Float)
                        .mean(tch::Kind::Float);
                    epoch_real_acc += real_acc.double_value(&[]);
                    epoch_fake_acc += fake_acc.double_value(&[]);
                }

                // ========== Train Generator ==========
                let noise = Tensor::randn([batch_size, latent_dim], (tch::Kind::Float, self.device));
                let fake_images = model.generator.forward_t(&noise, true);
                let fake_output = model.discriminator.forward_t(&fake_images, true);

                let g_loss = generator_loss(&fake_output);

                gen_opt.zero_grad();
                g_loss.backward();
                gen_opt.step();

                epoch_gen_loss += g_loss.double_value(&[]);
                batch_count += 1;

                // Update progress bar
                pb.set_message(format!(
                    "G: {:.4}, D: {:.4}",
                    g_loss.double_value(&[]),
                    epoch_disc_loss / (batch_count * self.config.disc_steps) as f64
                ));
                pb.inc(1);
            }

            pb.finish_with_message("done");

            // Calculate epoch averages
            let total_disc_updates = (batch_count * self.config.disc_steps) as f64;
            let avg_gen_loss = epoch_gen_loss / batch_count as f64;
            let avg_disc_loss = epoch_disc_loss / total_disc_updates;
            let avg_real_acc = epoch_real_acc / total_disc_updates;
            let avg_fake_acc = epoch_fake_acc / total_disc_updates;

            // Record metrics
            self.metrics
                .record_epoch(avg_gen_loss, avg_disc_loss, avg_real_acc, avg_fake_acc);

            info!(
                "Epoch {}/{}: G_loss={:.4}, D_loss={:.4}, Real_acc={:.2}%, Fake_acc={:.2}%",
                epoch + 1,
                self.config.epochs,
                avg_gen_loss,
                avg_disc_loss,
                avg_real_acc * 100.0,
                avg_fake_acc * 100.0
            );

            // Check for mode collapse
            if self.metrics.check_mode_collapse(10) {
                warn!("Possible mode collapse detected! Consider adjusting learning rates.");
            }

            // Save sample grid from the fixed noise
            if (epoch + 1) % self.config.sample_every == 0 {
                let samples = tch::no_grad(|| model.generator.generate(&fixed_noise));
                let sample_path =
                    format!("{}/epoch_{:04}.png", self.config.sample_dir, epoch + 1);
                let grid = GridConfig {
                    rows: self.config.sample_rows,
                    cols: self.config.sample_cols,
                    ..Default::default()
                };

                if let Err(e) = save_image_grid(&samples, &sample_path, &grid) {
                    warn!("Failed to save sample grid: {}", e);
                } else {
                    info!("Saved sample grid to {}", sample_path);
                }
            }

            // Save checkpoint
            if (epoch + 1) % self.config.checkpoint_every == 0 {
                if let Err(e) =
                    save_checkpoint(model, &self.metrics, epoch + 1, &self.config.checkpoint_dir)
                {
                    warn!("Failed to save checkpoint: {}", e);
                }
            }

            data_loader.reset();
        }

        // Save final model where the generate command expects it
        let gen_path = format!("{}/generator.pt", self.config.checkpoint_dir);
        let disc_path = format!("{}/discriminator.pt", self.config.checkpoint_dir);
        if let Err(e) = model.save(&gen_path, &disc_path) {
            warn!("Failed to save final model: {}", e);
        }

        // Save metrics
        let metrics_path = format!("{}/training_metrics.csv", self.config.checkpoint_dir);
        if let Err(e) = self.metrics.save_csv(&metrics_path) {
            warn!("Failed to save metrics: {}", e);
        }

        Ok(&self.metrics)
    }

    /// Get training metrics
    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    /// Get configuration
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }
}

/// Single training step (for more fine-grained control)
pub fn train_step(
    model: &mut Gan,
    real_images: &Tensor,
    gen_opt: &mut nn::Optimizer,
    disc_opt: &mut nn::Optimizer,
) -> (f64, f64) {
    let batch_size = real_images.size()[0];
    let latent_dim = model.latent_dim();
    let device = model.device;

    // Train discriminator
    let noise = Tensor::randn([batch_size, latent_dim], (tch::Kind::Float, device));
    let fake_images = model.generator.forward_t(&noise, true);

    let real_output = model.discriminator.forward_t(real_images, true);
    let fake_output = model.discriminator.forward_t(&fake_images.detach(), true);

    let d_loss = discriminator_loss(&real_output, &fake_output);

    disc_opt.zero_grad();
    d_loss.backward();
    disc_opt.step();

    // Train generator
    let noise = Tensor::randn([batch_size, latent_dim], (tch::Kind::Float, device));
    let fake_images = model.generator.forward_t(&noise, true);
    let fake_output = model.discriminator.forward_t(&fake_images, true);

    let g_loss = generator_loss(&fake_output);

    gen_opt.zero_grad();
    g_loss.backward();
    gen_opt.step();

    (g_loss.double_value(&[]), d_loss.double_value(&[]))
}
