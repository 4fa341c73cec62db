use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hyperparameters for a training run.
///
/// # Fields
/// - `epochs`        — total number of full passes over the training data
/// - `batch_size`    — samples per mini-batch; the last batch may be smaller
/// - `learning_rate` — gradient-descent step size
/// - `log_every`     — progress line every this many epochs; `0` disables it
///
/// Every field has a default, so a config file may set any subset of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig { epochs: 100, batch_size: 32, learning_rate: 0.1, log_every: 10 }
    }
}

/// Command-line overrides; `Some` fields win over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub epochs: Option<usize>,
    pub batch_size: Option<usize>,
    pub learning_rate: Option<f64>,
    pub log_every: Option<usize>,
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        TrainConfig { epochs, batch_size, learning_rate, ..TrainConfig::default() }
    }

    /// Deserializes a `TrainConfig` from a JSON file. Missing fields take
    /// their defaults.
    pub fn load_json(path: &std::path::Path) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    // merge configs where the overrides replace the stored values
    pub fn merge(self, other: ConfigOverrides) -> Self {
        TrainConfig {
            epochs: other.epochs.unwrap_or(self.epochs),
            batch_size: other.batch_size.unwrap_or(self.batch_size),
            learning_rate: other.learning_rate.unwrap_or(self.learning_rate),
            log_every: other.log_every.unwrap_or(self.log_every),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".into()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}
