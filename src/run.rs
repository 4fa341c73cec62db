use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::data::dataset::Dataset;
use crate::data::split::Preprocessor;
use crate::error::{Error, Result};
use crate::model::mlp::Mlp;
use crate::report::chart::plot_history;
use crate::train::epoch_stats::History;
use crate::train::tester::{TestReport, Tester};
use crate::train::train_config::TrainConfig;
use crate::train::trainer::Trainer;

/// Everything one end-to-end run needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Resampled training data; split 80/20 into train and validation.
    pub resampled: Dataset,
    /// Held-out test data, never split.
    pub test: Dataset,
    pub hidden_size: usize,
    pub config: TrainConfig,
    /// Seeds weight initialisation and epoch shuffling. `None` draws from
    /// the thread-local RNG.
    pub seed: Option<u64>,
    /// Where to write the loss/accuracy chart, if anywhere.
    pub plot_path: Option<PathBuf>,
    /// Where to write the history as JSON, if anywhere.
    pub history_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub mlp: Mlp,
    pub history: History,
    pub report: TestReport,
}

/// Splits, trains, tests, and optionally writes the chart and history.
pub fn run(params: RunParams) -> Result<RunOutcome> {
    let RunParams { resampled, test, hidden_size, config, seed, plot_path, history_path } = params;

    if test.is_empty() {
        return Err(Error::InvalidData("test set must not be empty".into()));
    }
    if resampled.feature_count() != test.feature_count() {
        return Err(Error::InvalidData(format!(
            "training data has {} features but test data has {}",
            resampled.feature_count(),
            test.feature_count()
        )));
    }

    let parts = Preprocessor::new(resampled, test).split()?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut mlp = Mlp::with_rng(parts.train.feature_count(), hidden_size, 1, &mut rng)?;
    info!(
        input = mlp.input_size(),
        hidden = mlp.hidden_size(),
        output = mlp.output_size(),
        "built network"
    );

    let history = Trainer::new(config).train_with_rng(&mut mlp, &parts.train, &parts.val, &mut rng)?;
    let report = Tester::test(&mlp, &parts.test)?;

    if let Some(path) = plot_path {
        plot_history(&history, &path)?;
    }
    if let Some(path) = history_path {
        history.save_json(&path)?;
        info!(path = %path.display(), "wrote history");
    }

    Ok(RunOutcome { mlp, history, report })
}
