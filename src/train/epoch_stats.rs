use serde::{Serialize, Deserialize};

/// Metrics of one completed epoch, computed over the full (unshuffled)
/// training and validation sets after the last batch update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    pub train_loss: f64,
    /// Fraction in [0, 1].
    pub train_accuracy: f64,
    pub val_loss: f64,
    pub val_accuracy: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

impl EpochStats {
    /// The progress line printed every few epochs.
    pub fn progress_line(&self) -> String {
        format!(
            "Epoch {}/{}, Train Loss: {:.4}, Train Acc: {:.4}, Val Loss: {:.4}, Val Acc: {:.4}",
            self.epoch,
            self.total_epochs,
            self.train_loss,
            self.train_accuracy,
            self.val_loss,
            self.val_accuracy
        )
    }
}

/// Per-epoch metric sequences; one entry per completed epoch in each vector.
///
/// Non-finite values are written to JSON as the strings `"NaN"`, `"inf"` and
/// `"-inf"` so a saturated run survives a save/load cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(with = "json_floats")]
    pub train_loss: Vec<f64>,
    #[serde(with = "json_floats")]
    pub train_accuracy: Vec<f64>,
    #[serde(with = "json_floats")]
    pub val_loss: Vec<f64>,
    #[serde(with = "json_floats")]
    pub val_accuracy: Vec<f64>,
}

impl History {
    pub fn push(&mut self, stats: &EpochStats) {
        self.train_loss.push(stats.train_loss);
        self.train_accuracy.push(stats.train_accuracy);
        self.val_loss.push(stats.val_loss);
        self.val_accuracy.push(stats.val_accuracy);
    }

    /// Number of epochs recorded.
    pub fn len(&self) -> usize {
        self.train_loss.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train_loss.is_empty()
    }

    /// Serializes the four sequences to a pretty-printed JSON file.
    pub fn save_json(&self, path: &std::path::Path) -> crate::error::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a history previously written by `save_json`.
    pub fn load_json(path: &std::path::Path) -> crate::error::Result<History> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// `Vec<f64>` as JSON numbers, with NaN and the infinities as strings since
/// JSON has no literal for them.
mod json_floats {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum JsonFloat {
        Number(f64),
        Tag(String),
    }

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        values
            .iter()
            .map(|&v| {
                if v.is_finite() {
                    JsonFloat::Number(v)
                } else if v.is_nan() {
                    JsonFloat::Tag("NaN".to_owned())
                } else if v > 0.0 {
                    JsonFloat::Tag("inf".to_owned())
                } else {
                    JsonFloat::Tag("-inf".to_owned())
                }
            })
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<JsonFloat>::deserialize(deserializer)?
            .into_iter()
            .map(|v| match v {
                JsonFloat::Number(n) => Ok(n),
                JsonFloat::Tag(tag) => match tag.as_str() {
                    "NaN" => Ok(f64::NAN),
                    "inf" => Ok(f64::INFINITY),
                    "-inf" => Ok(f64::NEG_INFINITY),
                    other => Err(D::Error::custom(format!("unknown float tag '{other}'"))),
                },
            })
            .collect()
    }
}
