//! Training metrics for monitoring GAN progress
//!
//! Provides structures for tracking and logging training progress.

/// Metrics collected during training
#[derive(Debug, Clone, Default)]
pub struct TrainingMetrics {
    /// Generator losses per epoch
    pub gen_losses: Vec<f64>,
    /// Discriminator losses per epoch
    pub disc_losses: Vec<f64>,
    /// Discriminator accuracy on real images
    pub disc_real_acc: Vec<f64>,
    /// Discriminator accuracy on fake images
    pub disc_fake_acc: Vec<f64>,
}

impl TrainingMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record epoch metrics
    pub fn record_epoch(&mut self, gen_loss: f64, disc_loss: f64, real_acc: f64, fake_acc: f64) {
        self.gen_losses.push(gen_loss);
        self.disc_losses.push(disc_loss);
        self.disc_real_acc.push(real_acc);
        self.disc_fake_acc.push(fake_acc);
    }

    /// Get number of recorded epochs
    pub fn num_epochs(&self) -> usize {
        self.gen_losses.len()
    }

    /// Get latest generator loss
    pub fn latest_gen_loss(&self) -> Option<f64> {
        self.gen_losses.last().copied()
    }

    /// Get latest discriminator loss
    pub fn latest_disc_loss(&self) -> Option<f64> {
        self.disc_losses.last().copied()
    }

    /// Calculate moving average of generator loss
    pub fn gen_loss_ma(&self, window: usize) -> f64 {
        moving_average(&self.gen_losses, window)
    }

    /// Calculate moving average of discriminator loss
    pub fn disc_loss_ma(&self, window: usize) -> f64 {
        moving_average(&self.disc_losses, window)
    }

    /// Check if training appears to have collapsed
    ///
    /// Mode collapse indicators:
    /// - Discriminator loss very low (can easily distinguish)
    /// - Generator loss very high (can't fool discriminator)
    pub fn check_mode_collapse(&self, window: usize) -> bool {
        if self.num_epochs() < window {
            return false;
        }

        let disc_ma = self.disc_loss_ma(window);
        let gen_ma = self.gen_loss_ma(window);

        // Heuristic thresholds for mode collapse detection
        disc_ma < 0.1 && gen_ma > 5.0
    }

    /// Check if training is balanced
    ///
    /// Good training has discriminator accuracy around 50-70%
    pub fn is_balanced(&self, window: usize) -> bool {
        if self.num_epochs() < window {
            return true;
        }

        let recent_real: Vec<_> = self.disc_real_acc.iter().rev().take(window).copied().collect();
        let recent_fake: Vec<_> = self.disc_fake_acc.iter().rev().take(window).copied().collect();

        let avg_real: f64 = recent_real.iter().sum::<f64>() / recent_real.len() as f64;
        let avg_fake: f64 = recent_fake.iter().sum::<f64>() / recent_fake.len() as f64;

        // Balanced if both accuracies are in reasonable range
        (0.3..0.9).contains(&avg_real) && (0.3..0.9).contains(&avg_fake)
    }

    /// Save metrics to CSV file
    pub fn save_csv(&self, path: &str) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(["epoch", "gen_loss", "disc_loss", "real_acc", "fake_acc"])?;

        for i in 0..self.num_epochs() {
            writer.write_record([
                (i + 1).to_string(),
                self.gen_losses[i].to_string(),
                self.disc_losses[i].to_string(),
                self.disc_real_acc[i].to_string(),
                self.disc_fake_acc[i].to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Load metrics from CSV file
    pub fn load_csv(path: &str) -> anyhow::Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut metrics = Self::new();

        for result in reader.records() {
            let record = result?;
            metrics.gen_losses.push(record[1].parse()?);
            metrics.disc_losses.push(record[2].parse()?);
            metrics.disc_real_acc.push(record[3].parse()?);
            metrics.disc_fake_acc.push(record[4].parse()?);
        }

        Ok(metrics)
    }
}

/// Moving average over the last `window` values
fn moving_average(values: &[f64], window: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = window.min(values.len());
    let recent = &values[values.len() - n..];
    recent.iter().sum::<f64>() / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_latest() {
        let mut metrics = TrainingMetrics::new();
        metrics.record_epoch(1.0, 0.5, 0.8, 0.7);
        metrics.record_epoch(0.9, 0.6, 0.7, 0.6);

        assert_eq!(metrics.num_epochs(), 2);
        assert_eq!(metrics.latest_gen_loss(), Some(0.9));
        assert_eq!(metrics.latest_disc_loss(), Some(0.6));
    }

    #[test]
    fn test_moving_average() {
        assert_eq!(moving_average(&[], 5), 0.0);
        assert!((moving_average(&[1.0, 2.0, 3.0], 2) - 2.5).abs() < 1e-9);
        assert!((moving_average(&[1.0, 2.0, 3.0], 10) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_mode_collapse_detection() {
        let mut metrics = TrainingMetrics::new();
        for _ in 0..10 {
            metrics.record_epoch(6.0, 0.05, 0.99, 0.99);
        }
        assert!(metrics.check_mode_collapse(10));

        let mut healthy = TrainingMetrics::new();
        for _ in 0..10 {
            healthy.record_epoch(1.0, 1.2, 0.6, 0.55);
        }
        assert!(!healthy.check_mode_collapse(10));
        assert!(healthy.is_balanced(10));
    }

    #[test]
    fn test_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");

        let mut metrics = TrainingMetrics::new();
        metrics.record_epoch(1.5, 0.8, 0.75, 0.65);
        metrics.record_epoch(1.2, 0.9, 0.7, 0.6);

        metrics.save_csv(path.to_str().unwrap()).unwrap();
        let loaded = TrainingMetrics::load_csv(path.to_str().unwrap()).unwrap();

        assert_eq!(loaded.num_epochs(), 2);
        assert_eq!(loaded.gen_losses, metrics.gen_losses);
        assert_eq!(loaded.disc_fake_acc, metrics.disc_fake_acc);
    }
}
