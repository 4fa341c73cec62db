use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Dense row-major matrix. Samples are rows, features are columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    /// Both u1 and u2 must be uniform on (0, 1].
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Draw two independent uniform samples in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Samples every entry independently from N(0, std_dev²).
    pub fn random_normal<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    /// Builds a matrix from rows, rejecting ragged input.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map(|r| r.len()).unwrap_or(0);
        if let Some((i, row)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(Error::InvalidData(format!(
                "row {i} has {} columns, expected {cols}",
                row.len()
            )));
        }
        Ok(Matrix { rows: data.len(), cols, data })
    }

    /// Single-column matrix, one row per value.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Matrix product `self · rhs`.
    pub fn dot(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(self.mismatch("dot", rhs));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for k in 0..self.cols {
                let a = self.data[i][k];
                for j in 0..res.cols {
                    res.data[i][j] += a * rhs.data[k][j];
                }
            }
        }

        Ok(res)
    }

    /// Adds a `1 × cols` row vector to every row.
    pub fn add_row(&self, row: &Matrix) -> Result<Matrix> {
        if row.rows != 1 || row.cols != self.cols {
            return Err(self.mismatch("add_row", row));
        }
        let bias = &row.data[0];
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|r| r.iter().zip(bias).map(|(x, b)| x + b).collect())
                .collect(),
        })
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("sub", rhs, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("hadamard", rhs, |a, b| a * b)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Column means as a `1 × cols` row vector (mean over the batch axis).
    pub fn mean_rows(&self) -> Matrix {
        let mut res = Matrix::zeros(1, self.cols);
        for row in &self.data {
            for (acc, x) in res.data[0].iter_mut().zip(row) {
                *acc += x;
            }
        }
        let n = self.rows as f64;
        res.data[0].iter_mut().for_each(|x| *x /= n);
        res
    }

    /// `self -= factor * rhs`, in place. Shapes must match.
    pub fn sub_scaled_assign(&mut self, rhs: &Matrix, factor: f64) -> Result<()> {
        if self.shape() != rhs.shape() {
            return Err(self.mismatch("sub_scaled_assign", rhs));
        }
        for (row, rrow) in self.data.iter_mut().zip(&rhs.data) {
            for (x, g) in row.iter_mut().zip(rrow) {
                *x -= factor * g;
            }
        }
        Ok(())
    }

    /// Copies the given rows, in order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data: indices.iter().map(|&i| self.data[i].clone()).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter().flatten()
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(self.mismatch(op, rhs));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .zip(&rhs.data)
                .map(|(a, b)| a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect())
                .collect(),
        })
    }

    fn mismatch(&self, op: &'static str, rhs: &Matrix) -> Error {
        Error::ShapeMismatch { op, left: self.shape(), right: rhs.shape() }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn dot_multiplies_and_checks_shapes() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::column(&[1.0, 1.0]);
        assert_eq!(a.dot(&b).unwrap().data, vec![vec![3.0], vec![7.0]]);

        let err = b.dot(&a).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { op: "dot", left: (2, 1), right: (2, 2) }));
    }

    #[test]
    fn add_row_broadcasts_over_rows() {
        let a = Matrix::zeros(3, 2);
        let bias = Matrix::from_rows(vec![vec![1.0, -1.0]]).unwrap();
        let out = a.add_row(&bias).unwrap();
        assert!(out.data.iter().all(|r| r == &vec![1.0, -1.0]));
        assert!(a.add_row(&Matrix::zeros(1, 3)).is_err());
    }

    #[test]
    fn mean_rows_averages_each_column() {
        let a = Matrix::from_rows(vec![vec![1.0, 10.0], vec![3.0, 20.0]]).unwrap();
        assert_eq!(a.mean_rows().data, vec![vec![2.0, 15.0]]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(Matrix::from_rows(vec![vec![1.0], vec![1.0, 2.0]]).is_err());
    }

    #[test]
    fn random_normal_is_centered_and_scaled() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::random_normal(200, 50, 0.01, &mut rng);
        let n = (m.rows * m.cols) as f64;
        let mean = m.iter().sum::<f64>() / n;
        let var = m.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 1e-3);
        assert!((var.sqrt() - 0.01).abs() < 1e-3);
    }
}
