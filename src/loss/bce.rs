use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

pub struct BceLoss;

impl BceLoss {
    /// Scalar BCE: -mean(y·ln(p) + (1-y)·ln(1-p)) over every element.
    ///
    /// No epsilon is added: a saturated output of exactly 0 or 1 yields an
    /// infinite or NaN loss, which the caller records as-is.
    /// An empty batch yields NaN.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        check_aligned("bce", predicted, expected)?;
        let n = (predicted.rows * predicted.cols) as f64;
        let total: f64 = predicted.iter().zip(expected.iter())
            .map(|(p, y)| y * p.ln() + (1.0 - y) * (1.0 - p).ln())
            .sum();
        Ok(-total / n)
    }

    /// Gradient w.r.t. the output pre-activation when paired with a sigmoid
    /// output unit: `p - y`.
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Result<Matrix> {
        predicted.sub(expected)
    }
}

/// Fraction of elements where the thresholded output (`p > 0.5`) equals the
/// label. An empty batch yields NaN.
pub fn accuracy(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
    check_aligned("accuracy", predicted, expected)?;
    let n = (predicted.rows * predicted.cols) as f64;
    let correct = predicted.iter().zip(expected.iter())
        .filter(|(p, y)| {
            let class = if **p > 0.5 { 1.0 } else { 0.0 };
            class == **y
        })
        .count();
    Ok(correct as f64 / n)
}

fn check_aligned(op: &'static str, predicted: &Matrix, expected: &Matrix) -> Result<()> {
    if predicted.shape() != expected.shape() {
        return Err(Error::ShapeMismatch { op, left: predicted.shape(), right: expected.shape() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn loss_matches_hand_computation() {
        let p = Matrix::column(&[0.9, 0.2]);
        let y = Matrix::column(&[1.0, 0.0]);
        let expected = -(0.9f64.ln() + 0.8f64.ln()) / 2.0;
        assert_relative_eq!(BceLoss::loss(&p, &y).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn loss_is_non_negative_on_open_interval() {
        let preds = [1e-9, 0.01, 0.3, 0.5, 0.77, 0.999_999];
        for &p in &preds {
            for &y in &[0.0, 1.0] {
                let loss = BceLoss::loss(&Matrix::column(&[p]), &Matrix::column(&[y])).unwrap();
                assert!(loss >= 0.0, "loss {loss} for p={p}, y={y}");
            }
        }
    }

    #[test]
    fn saturated_output_is_not_guarded() {
        let loss = BceLoss::loss(&Matrix::column(&[1.0]), &Matrix::column(&[0.0])).unwrap();
        assert!(loss.is_infinite());
        let loss = BceLoss::loss(&Matrix::column(&[0.0, 1.0]), &Matrix::column(&[0.0, 1.0])).unwrap();
        assert!(loss.is_nan());
    }

    #[test]
    fn accuracy_thresholds_strictly_above_half() {
        let p = Matrix::column(&[0.5, 0.51, 0.1, 0.9]);
        let y = Matrix::column(&[0.0, 1.0, 1.0, 1.0]);
        assert_relative_eq!(accuracy(&p, &y).unwrap(), 0.75);
    }

    #[test]
    fn misaligned_labels_are_rejected() {
        assert!(BceLoss::loss(&Matrix::column(&[0.5]), &Matrix::column(&[0.0, 1.0])).is_err());
        assert!(accuracy(&Matrix::column(&[0.5]), &Matrix::zeros(1, 2)).is_err());
    }
}
