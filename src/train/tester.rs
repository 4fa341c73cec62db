use tracing::info;

use crate::data::dataset::Dataset;
use crate::error::Result;
use crate::loss::bce::{accuracy, BceLoss};
use crate::math::matrix::Matrix;
use crate::model::mlp::Mlp;

/// Result of evaluating a trained network on the held-out test set.
#[derive(Debug, Clone)]
pub struct TestReport {
    pub loss: f64,
    pub accuracy: f64,
    /// Raw sigmoid outputs, one row per test sample.
    pub output: Matrix,
}

impl TestReport {
    pub fn summary_line(&self) -> String {
        format!("Test Loss: {:.4}, Test Accuracy: {:.4}", self.loss, self.accuracy)
    }
}

/// Read-only evaluation of a trained network.
pub struct Tester;

impl Tester {
    /// One forward pass over `test`; the network is not modified.
    pub fn test(mlp: &Mlp, test: &Dataset) -> Result<TestReport> {
        let output = mlp.predict(test.features())?;
        let report = TestReport {
            loss: BceLoss::loss(&output, test.labels())?,
            accuracy: accuracy(&output, test.labels())?,
            output,
        };
        info!("{}", report.summary_line());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_leaves_parameters_untouched() {
        let mlp = Mlp::with_rng(2, 3, 1, &mut StdRng::seed_from_u64(9)).unwrap();
        let before = mlp.clone();
        let ds = Dataset::from_rows(vec![vec![1.0, 2.0], vec![-1.0, 0.5]], &[1.0, 0.0]).unwrap();

        let report = Tester::test(&mlp, &ds).unwrap();

        assert_eq!(mlp, before);
        assert_eq!(report.output.shape(), (2, 1));
        assert!(report.loss > 0.0);
        assert!(report.summary_line().starts_with("Test Loss: "));
    }

    #[test]
    fn mismatched_feature_count_propagates() {
        let mlp = Mlp::new(3, 2, 1).unwrap();
        let ds = Dataset::from_rows(vec![vec![1.0, 2.0]], &[1.0]).unwrap();
        assert!(Tester::test(&mlp, &ds).is_err());
    }
}
