use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ferrite_mlp::data::csv::read_csv;
use ferrite_mlp::data::synthetic::two_blobs;
use ferrite_mlp::train::{ConfigOverrides, TrainConfig};
use ferrite_mlp::{run, utils, Dataset, RunParams};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Log every epoch and internal steps
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train on CSV files (last column is the 0/1 label)
    Train {
        /// Resampled training data; 20% is held out for validation
        #[arg(long, value_name = "PATH")]
        train: PathBuf,
        /// Held-out test data
        #[arg(long, value_name = "PATH")]
        test: PathBuf,
        #[command(flatten)]
        opts: TrainArgs,
    },
    /// Train on two generated Gaussian blobs
    Demo {
        /// Number of training samples
        #[arg(long, value_name = "INT", default_value_t = 150)]
        samples: usize,
        /// Features per sample
        #[arg(long, value_name = "INT", default_value_t = 4)]
        features: usize,
        #[command(flatten)]
        opts: TrainArgs,
    },
}

#[derive(Args)]
struct TrainArgs {
    /// JSON file with any of: epochs, batch_size, learning_rate, log_every
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Hidden layer width
    #[arg(long, value_name = "INT", default_value_t = 10)]
    hidden: usize,
    #[arg(short, long, value_name = "INT")]
    epochs: Option<usize>,
    #[arg(short = 'l', long, value_name = "FLOAT")]
    learning_rate: Option<f64>,
    #[arg(short, long, value_name = "INT")]
    batch_size: Option<usize>,
    /// Seed weight initialisation and shuffling for a repeatable run
    #[arg(short, long, value_name = "INT")]
    seed: Option<u64>,
    /// Write loss/accuracy curves to this PNG
    #[arg(long, value_name = "PATH")]
    plot: Option<PathBuf>,
    /// Write the per-epoch history to this JSON file
    #[arg(long, value_name = "PATH")]
    history: Option<PathBuf>,
}

impl TrainArgs {
    fn into_params(self, resampled: Dataset, test: Dataset) -> Result<RunParams, Box<dyn Error>> {
        let base = match &self.config {
            Some(path) => TrainConfig::load_json(path)?,
            None => TrainConfig::default(),
        };
        let config = base.merge(ConfigOverrides {
            epochs: self.epochs,
            batch_size: self.batch_size,
            learning_rate: self.learning_rate,
            log_every: None,
        });
        Ok(RunParams {
            resampled,
            test,
            hidden_size: self.hidden,
            config,
            seed: self.seed,
            plot_path: self.plot,
            history_path: self.history,
        })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    utils::init_logging(args.verbose)?;

    let params = match args.command {
        Command::Train { train, test, opts } => {
            let resampled = read_csv(&train)?;
            let test = read_csv(&test)?;
            opts.into_params(resampled, test)?
        }
        Command::Demo { samples, features, opts } => {
            let mut rng = match opts.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let resampled = two_blobs(samples, features, 3.0, 1.0, &mut rng)?;
            let test = two_blobs((samples / 4).max(1), features, 3.0, 1.0, &mut rng)?;
            opts.into_params(resampled, test)?
        }
    };

    run(params)?;
    Ok(())
}
