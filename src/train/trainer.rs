use rand::Rng;
use tracing::info;

use crate::data::dataset::Dataset;
use crate::error::Result;
use crate::model::mlp::Mlp;
use crate::train::epoch_stats::History;
use crate::train::loop_fn::train_loop;
use crate::train::train_config::TrainConfig;

/// Runs epochs of shuffled mini-batch training over an [`Mlp`].
pub struct Trainer {
    pub config: TrainConfig,
}

impl Trainer {
    pub fn new(config: TrainConfig) -> Trainer {
        Trainer { config }
    }

    /// Trains with the thread-local RNG, so batch order differs between runs.
    pub fn train(&self, mlp: &mut Mlp, train: &Dataset, val: &Dataset) -> Result<History> {
        self.train_with_rng(mlp, train, val, &mut rand::thread_rng())
    }

    /// Trains with a caller-supplied RNG; a seeded RNG makes the run repeatable.
    pub fn train_with_rng<R: Rng + ?Sized>(
        &self,
        mlp: &mut Mlp,
        train: &Dataset,
        val: &Dataset,
        rng: &mut R,
    ) -> Result<History> {
        info!(
            epochs = self.config.epochs,
            batch_size = self.config.batch_size,
            learning_rate = self.config.learning_rate,
            samples = train.len(),
            "starting training"
        );
        train_loop(mlp, train, val, &self.config, rng)
    }
}
