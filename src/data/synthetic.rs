use rand::Rng;

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Generates `n` samples of two Gaussian blobs in `features` dimensions.
///
/// Class 0 is centred at `-separation / 2` on every axis, class 1 at
/// `+separation / 2`, both with standard deviation `spread`. Classes
/// alternate, so any `n` is balanced to within one sample.
pub fn two_blobs<R: Rng + ?Sized>(
    n: usize,
    features: usize,
    separation: f64,
    spread: f64,
    rng: &mut R,
) -> Result<Dataset> {
    if n == 0 || features == 0 {
        return Err(Error::InvalidConfig(format!(
            "need at least one sample and one feature, got {n}x{features}"
        )));
    }

    let mut x = Matrix::random_normal(n, features, spread, rng);
    let mut labels = Vec::with_capacity(n);
    for (i, row) in x.data.iter_mut().enumerate() {
        let class = (i % 2) as f64;
        let centre = (class - 0.5) * separation;
        row.iter_mut().for_each(|v| *v += centre);
        labels.push(class);
    }

    Dataset::new(x, Matrix::column(&labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn blobs_are_balanced_and_separated() {
        let ds = two_blobs(150, 4, 4.0, 0.5, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(ds.len(), 150);
        assert_eq!(ds.feature_count(), 4);

        let ones = ds.labels().iter().filter(|&&y| y == 1.0).count();
        assert_eq!(ones, 75);

        for (row, y) in ds.features().data.iter().zip(ds.labels().iter()) {
            let mean = row.iter().sum::<f64>() / row.len() as f64;
            assert_eq!(mean > 0.0, *y == 1.0);
        }
    }
}
