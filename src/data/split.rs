use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};

/// Seed of the train/validation split, fixed so validation is reproducible.
pub const SPLIT_SEED: u64 = 42;

/// Share of the resampled training data held out for validation.
pub const VAL_FRACTION: f64 = 0.2;

/// The three disjoint datasets a run works on.
#[derive(Debug, Clone)]
pub struct Partitions {
    pub train: Dataset,
    pub val: Dataset,
    pub test: Dataset,
}

/// Holds the (already resampled) training data and the pre-separated test set
/// until they are partitioned.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    resampled: Dataset,
    test: Dataset,
}

impl Preprocessor {
    pub fn new(resampled: Dataset, test: Dataset) -> Preprocessor {
        Preprocessor { resampled, test }
    }

    /// 80/20 train/validation split of the resampled data with [`SPLIT_SEED`].
    /// The test set is passed through untouched.
    pub fn split(self) -> Result<Partitions> {
        let (train, val) = train_val_split(&self.resampled, VAL_FRACTION, SPLIT_SEED)?;
        info!(
            train = train.len(),
            val = val.len(),
            test = self.test.len(),
            "partitioned dataset"
        );
        Ok(Partitions { train, val, test: self.test })
    }
}

/// Shuffles sample indices with a seeded RNG and holds out
/// `ceil(n * val_fraction)` of them for validation.
pub fn train_val_split(ds: &Dataset, val_fraction: f64, seed: u64) -> Result<(Dataset, Dataset)> {
    let (train_idx, val_idx) = split_indices(ds.len(), val_fraction, seed)?;
    Ok((ds.select(&train_idx), ds.select(&val_idx)))
}

/// Index-level split behind [`train_val_split`]: returns `(train, val)`.
pub fn split_indices(n: usize, val_fraction: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(val_fraction > 0.0 && val_fraction < 1.0) {
        return Err(Error::InvalidConfig(format!(
            "validation fraction must lie in (0, 1), got {val_fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let val_n = (n as f64 * val_fraction).ceil() as usize;
    let val = indices.split_off(n - val_n);
    Ok((indices, val))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_is_disjoint_and_covering() {
        for &n in &[1usize, 5, 10, 99, 150] {
            let (train, val) = split_indices(n, VAL_FRACTION, SPLIT_SEED).unwrap();
            assert_eq!(train.len() + val.len(), n);

            let mut seen = vec![0u8; n];
            for &i in train.iter().chain(val.iter()) {
                seen[i] += 1;
            }
            assert!(seen.iter().all(|&c| c == 1), "n={n}");
        }
    }

    #[test]
    fn eighty_twenty_counts() {
        let (train, val) = split_indices(150, VAL_FRACTION, SPLIT_SEED).unwrap();
        assert_eq!((train.len(), val.len()), (120, 30));
        let (train, val) = split_indices(101, VAL_FRACTION, SPLIT_SEED).unwrap();
        assert_eq!((train.len(), val.len()), (80, 21));
    }

    #[test]
    fn same_seed_same_split() {
        assert_eq!(split_indices(50, 0.2, 7).unwrap(), split_indices(50, 0.2, 7).unwrap());
    }

    #[test]
    fn fraction_outside_unit_interval_is_rejected() {
        assert!(split_indices(10, 0.0, 1).is_err());
        assert!(split_indices(10, 1.0, 1).is_err());
    }

    #[test]
    fn test_partition_is_untouched() {
        let resampled = Dataset::from_rows((0..10).map(|i| vec![i as f64]).collect(), &[0.0; 10]).unwrap();
        let test = Dataset::from_rows(vec![vec![7.0], vec![8.0]], &[1.0, 0.0]).unwrap();
        let parts = Preprocessor::new(resampled, test.clone()).split().unwrap();
        assert_eq!(parts.test, test);
        assert_eq!(parts.train.len(), 8);
        assert_eq!(parts.val.len(), 2);
    }
}
