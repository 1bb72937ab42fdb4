//! Vanilla GAN for MNIST handwritten digits
//!
//! Main entry point providing CLI interface for:
//! - Downloading the MNIST dataset
//! - Training the GAN
//! - Generating sample image grids

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mnist_gan::{
    data::{DataLoader, MnistDataset, MnistDownloader},
    model::Gan,
    training::{Trainer, TrainingConfig},
    utils::{ensure_config_exists, images::GridConfig, load_checkpoint, save_image_grid, Config},
};

/// Vanilla GAN trained on MNIST
#[derive(Parser)]
#[command(name = "mnist_gan")]
#[command(version = "0.1.0")]
#[command(about = "Train a vanilla GAN on MNIST and generate digit images")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the MNIST archives
    Download {
        /// Directory to store the dataset
        #[arg(short, long)]
        data_dir: Option<String>,

        /// Mirror URL to download from
        #[arg(short, long)]
        mirror: Option<String>,
    },

    /// Train the GAN
    Train {
        /// Directory holding the MNIST files
        #[arg(short, long)]
        data_dir: Option<String>,

        /// Number of epochs
        #[arg(short, long, default_value = "100")]
        epochs: usize,

        /// Resume from checkpoint directory
        #[arg(long)]
        resume: Option<String>,
    },

    /// Generate a grid of digit images from a trained model
    Generate {
        /// Directory containing generator.pt and discriminator.pt
        #[arg(short, long)]
        model: String,

        /// Grid rows
        #[arg(long, default_value = "8")]
        rows: usize,

        /// Grid columns
        #[arg(long, default_value = "8")]
        cols: usize,

        /// Output PNG path
        #[arg(short, long, default_value = "generated.png")]
        output: String,
    },

    /// Initialize default configuration file
    Init {
        /// Output configuration file path
        #[arg(short, long, default_value = "config.json")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = match cli.verbosity.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Download { data_dir, mirror } => {
            download_dataset(&cli.config, data_dir, mirror).await?;
        }
        Commands::Train {
            data_dir,
            epochs,
            resume,
        } => {
            train_model(&cli.config, data_dir, epochs, resume)?;
        }
        Commands::Generate {
            model,
            rows,
            cols,
            output,
        } => {
            generate_grid(&cli.config, &model, rows, cols, &output)?;
        }
        Commands::Init { output } => {
            init_config(&output)?;
        }
    }

    Ok(())
}

/// Load the config file, falling back to defaults when it is absent
fn load_config(config_path: &str) -> Result<Config> {
    let config = if Path::new(config_path).exists() {
        if config_path.ends_with(".toml") {
            Config::from_toml(config_path)?
        } else {
            Config::from_json(config_path)?
        }
    } else {
        info!("Config file not found, using defaults");
        Config::default()
    };
    config.validate()?;
    Ok(config)
}

/// Download the MNIST archives
async fn download_dataset(
    config_path: &str,
    data_dir: Option<String>,
    mirror: Option<String>,
) -> Result<()> {
    let config = load_config(config_path)?;

    let data_dir = data_dir.unwrap_or(config.data.data_dir);
    let mirror = mirror.unwrap_or(config.data.mirror);

    info!("Downloading MNIST into {} from {}", data_dir, mirror);

    let downloader = MnistDownloader::with_base_url(&mirror);
    downloader.download_all(Path::new(&data_dir)).await?;

    info!("Download complete");
    Ok(())
}

/// Train the GAN
fn train_model(
    config_path: &str,
    data_dir: Option<String>,
    epochs: usize,
    resume: Option<String>,
) -> Result<()> {
    let config = load_config(config_path)?;

    // Determine device
    let device = config.get_device();
    info!("Using device: {:?}", device);

    // Load training split
    let data_dir = data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    info!("Loading MNIST from {}", data_dir);
    let dataset = MnistDataset::load_train(Path::new(&data_dir))?;

    info!(
        "Loaded {} images of {}x{} pixels",
        dataset.len(),
        dataset.rows,
        dataset.cols
    );

    let image_dim = dataset.image_dim() as i64;
    if image_dim != config.model.image_dim {
        info!(
            "Dataset image size {} overrides configured {}",
            image_dim, config.model.image_dim
        );
    }

    // Create data loader
    let mut data_loader = DataLoader::new(
        dataset.images,
        config.data.batch_size,
        true, // shuffle
        true, // drop_last
    );

    // Create model
    let (gen_config, disc_config) = config.network_configs(image_dim);
    let mut model = Gan::new(gen_config, disc_config, device);

    // Create trainer
    let training_config = TrainingConfig {
        epochs,
        gen_lr: config.training.gen_lr,
        disc_lr: config.training.disc_lr,
        disc_steps: config.training.disc_steps,
        checkpoint_every: config.training.checkpoint_every,
        checkpoint_dir: config.training.checkpoint_dir.clone(),
        sample_every: config.training.sample_every,
        sample_dir: config.training.sample_dir.clone(),
        sample_rows: config.training.sample_rows,
        sample_cols: config.training.sample_cols,
        label_smoothing: config.training.label_smoothing,
        ..Default::default()
    };

    let mut trainer = Trainer::new(training_config, device);

    // Resume from checkpoint if specified
    if let Some(checkpoint_path) = resume {
        let (epoch, metrics) = load_checkpoint(&mut model, &checkpoint_path)?;
        info!("Resuming from epoch {}", epoch);
        trainer.resume_from(epoch, metrics);
    }

    // Train
    info!("Training up to {} total epochs", epochs);
    let metrics = trainer.train(&mut model, &mut data_loader)?;

    info!(
        "Training complete. Final G_loss: {:.4}, D_loss: {:.4}",
        metrics.latest_gen_loss().unwrap_or(0.0),
        metrics.latest_disc_loss().unwrap_or(0.0)
    );

    Ok(())
}

/// Generate a sample grid from a trained model
fn generate_grid(
    config_path: &str,
    model_path: &str,
    rows: usize,
    cols: usize,
    output_path: &str,
) -> Result<()> {
    let config = load_config(config_path)?;
    let device = config.get_device();

    // Create model with the same widths the training run used
    let (gen_config, disc_config) = config.network_configs(config.model.image_dim);
    let mut model = Gan::new(gen_config, disc_config, device);

    // Load weights
    let gen_path = format!("{}/generator.pt", model_path);
    let disc_path = format!("{}/discriminator.pt", model_path);
    model.load(&gen_path, &disc_path)?;

    info!("Loaded model from {}", model_path);

    // Generate samples
    let num_samples = (rows * cols) as i64;
    info!("Generating {} digit images", num_samples);
    let samples = tch::no_grad(|| model.generate(num_samples));

    let image_size = (config.model.image_dim as f64).sqrt() as usize;
    let grid = GridConfig {
        rows,
        cols,
        image_size,
        ..Default::default()
    };

    save_image_grid(&samples, output_path, &grid)?;
    info!("Saved generated grid to {}", output_path);

    Ok(())
}

/// Initialize the configuration file, keeping an existing one untouched
fn init_config(output_path: &str) -> Result<()> {
    ensure_config_exists(output_path)?;
    info!("Configuration ready at {}", output_path);
    Ok(())
}
