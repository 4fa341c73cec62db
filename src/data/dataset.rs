use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Feature rows paired with 0/1 labels.
///
/// Labels are always stored as an `n × 1` column so they line up element-wise
/// with the network output.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Matrix,
    labels: Matrix,
}

impl Dataset {
    /// Wraps a feature matrix and a label column. Row counts must agree and
    /// labels must be finite.
    pub fn new(features: Matrix, labels: Matrix) -> Result<Dataset> {
        if labels.cols != 1 {
            return Err(Error::InvalidData(format!(
                "labels must be a single column, got {} columns",
                labels.cols
            )));
        }
        if features.rows != labels.rows {
            return Err(Error::InvalidData(format!(
                "{} feature rows but {} labels",
                features.rows, labels.rows
            )));
        }
        if let Some(bad) = labels.iter().find(|y| !y.is_finite()) {
            return Err(Error::InvalidData(format!("label {bad} is not finite")));
        }
        Ok(Dataset { features, labels })
    }

    /// Convenience constructor from per-sample rows and a flat label slice.
    pub fn from_rows(features: Vec<Vec<f64>>, labels: &[f64]) -> Result<Dataset> {
        Dataset::new(Matrix::from_rows(features)?, Matrix::column(labels))
    }

    pub fn features(&self) -> &Matrix {
        &self.features
    }

    pub fn labels(&self) -> &Matrix {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.features.rows
    }

    pub fn is_empty(&self) -> bool {
        self.features.rows == 0
    }

    pub fn feature_count(&self) -> usize {
        self.features.cols
    }

    /// Copies the given samples, in order, into a new dataset.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select_rows(indices),
            labels: self.labels.select_rows(indices),
        }
    }
}
