use std::ops::Range;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::loss::bce::{accuracy, BceLoss};
use crate::model::mlp::Mlp;
use crate::train::epoch_stats::{EpochStats, History};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `mlp` for `config.epochs` epochs and returns the per-epoch history.
///
/// # Arguments
/// - `mlp`    — mutable reference to the network; modified in place
/// - `train`  — shuffled into mini-batches every epoch
/// - `val`    — only evaluated, never trained on
/// - `config` — hyperparameters
/// - `rng`    — source of the per-epoch permutations
///
/// # Errors
/// Fails with `InvalidConfig` on an empty training set or degenerate config,
/// and with `ShapeMismatch` when the data does not fit the network. A
/// non-finite loss is recorded in the history and does not stop training.
pub fn train_loop<R: Rng + ?Sized>(
    mlp: &mut Mlp,
    train: &Dataset,
    val: &Dataset,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<History> {
    config.validate()?;
    if train.is_empty() {
        return Err(Error::InvalidConfig("training set must not be empty".into()));
    }

    let mut history = History::default();
    let mut warned_non_finite = false;

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        run_one_epoch(mlp, train, config, rng)?;

        // ── Epoch-level metrics on the full, unshuffled sets ──────────────
        let (train_loss, train_accuracy) = evaluate(mlp, train)?;
        let (val_loss, val_accuracy) = evaluate(mlp, val)?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            train_accuracy,
            val_loss,
            val_accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if !warned_non_finite && !train_loss.is_finite() {
            warn!(epoch, "training loss is not finite; outputs have saturated");
            warned_non_finite = true;
        }

        // ── Emit progress ─────────────────────────────────────────────────
        if is_progress_epoch(epoch, config.log_every) {
            info!("{}", stats.progress_line());
        } else {
            debug!(epoch, elapsed_ms = stats.elapsed_ms, "{}", stats.progress_line());
        }

        history.push(&stats);
    }

    Ok(history)
}

/// Consecutive `[start, end)` ranges covering `0..n` in steps of
/// `batch_size`. The last range holds the remainder.
pub fn batch_ranges(n: usize, batch_size: usize) -> Result<Vec<Range<usize>>> {
    if batch_size == 0 {
        return Err(Error::InvalidConfig("batch_size must be at least 1".into()));
    }
    Ok((0..n)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(n))
        .collect())
}

/// Loss and accuracy of one forward pass over the whole dataset.
pub fn evaluate(mlp: &Mlp, ds: &Dataset) -> Result<(f64, f64)> {
    if ds.is_empty() {
        return Ok((f64::NAN, f64::NAN));
    }
    let output = mlp.predict(ds.features())?;
    Ok((BceLoss::loss(&output, ds.labels())?, accuracy(&output, ds.labels())?))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs one full epoch of mini-batch gradient descent over the training data.
fn run_one_epoch<R: Rng + ?Sized>(
    mlp: &mut Mlp,
    train: &Dataset,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<()> {
    // Shuffle sample order each epoch.
    let mut indices: Vec<usize> = (0..train.len()).collect();
    indices.shuffle(rng);

    for range in batch_ranges(indices.len(), config.batch_size)? {
        let batch = train.select(&indices[range]);
        let pass = mlp.forward(batch.features())?;
        mlp.backward(batch.features(), batch.labels(), &pass, config.learning_rate)?;
    }

    Ok(())
}

/// Progress lines go out on every `log_every`-th epoch only.
fn is_progress_epoch(epoch: usize, log_every: usize) -> bool {
    log_every > 0 && epoch % log_every == 0
}
