use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

/// Minimal row-major dense matrix backing the network's weights, biases and
/// activations. Shape mismatches are programming errors and panic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    /// Both u1 and u2 must be uniform on (0, 1].
    fn sample_standard_normal(rng: &mut ThreadRng) -> f64 {
        // Draw from (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    fn gaussian(rows: usize, cols: usize, std_dev: f64) -> Matrix {
        let mut rng = rand::thread_rng();
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for x in row.iter_mut() {
                *x = Matrix::sample_standard_normal(&mut rng) * std_dev;
            }
        }
        res
    }

    /// He initialization: N(0, sqrt(2 / rows)).
    ///
    /// Weights are stored input×output, so `rows` is the fan-in. The 2/fan_in
    /// variance compensates for ReLU-family activations zeroing roughly half
    /// of their inputs.
    pub fn he(rows: usize, cols: usize) -> Matrix {
        Matrix::gaussian(rows, cols, (2.0 / rows as f64).sqrt())
    }

    /// Xavier (Glorot) initialization: N(0, sqrt(1 / rows)), with `rows` as
    /// the fan-in. Used before saturating activations (Sigmoid, Tanh) and
    /// the Softmax output layer.
    pub fn xavier(rows: usize, cols: usize) -> Matrix {
        Matrix::gaussian(rows, cols, (1.0 / rows as f64).sqrt())
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
        Matrix::from_data(
            self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        )
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data[0].len(),
            data,
        }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!(
                "cannot add a {}x{} matrix and a {}x{} matrix",
                self.rows, self.cols, rhs.rows, rhs.cols
            )
        }

        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| x + y).collect())
            .collect();
        Matrix::from_data(data)
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!(
                "cannot subtract a {}x{} matrix from a {}x{} matrix",
                rhs.rows, rhs.cols, self.rows, self.cols
            )
        }

        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| x - y).collect())
            .collect();
        Matrix::from_data(data)
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!(
                "cannot multiply a {}x{} matrix by a {}x{} matrix",
                self.rows, self.cols, rhs.rows, rhs.cols
            )
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }
                res.data[i][j] = sum;
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_has_requested_shape() {
        let m = Matrix::zeros(3, 2);
        assert_eq!(m.rows, 3);
        assert_eq!(m.cols, 2);
        assert!(m.data.iter().flatten().all(|&x| x == 0.0));
    }

    #[test]
    fn transpose_swaps_axes() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let t = m.transpose();
        assert_eq!(t.rows, 3);
        assert_eq!(t.cols, 2);
        assert_eq!(t.data[2][0], 3.0);
        assert_eq!(t.data[0][1], 4.0);
    }

    #[test]
    fn mul_computes_dot_products() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0]]);
        let b = Matrix::from_data(vec![vec![3.0, 4.0], vec![5.0, 6.0]]);
        let c = a * b;
        assert_eq!(c.rows, 1);
        assert_eq!(c.cols, 2);
        assert_eq!(c.data[0], vec![13.0, 16.0]);
    }

    #[test]
    fn add_and_sub_are_element_wise() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0]]);
        let b = Matrix::from_data(vec![vec![0.5, 1.0]]);
        assert_eq!((a.clone() + b.clone()).data[0], vec![1.5, 3.0]);
        assert_eq!((a - b).data[0], vec![0.5, 1.0]);
    }

    #[test]
    #[should_panic]
    fn mul_panics_on_shape_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        let _ = a * b;
    }

    #[test]
    fn he_init_scales_with_fan_in() {
        // With a large fan-in the per-weight standard deviation is tiny, so
        // every sample should sit well inside a loose bound.
        let m = Matrix::he(10_000, 4);
        assert!(m.data.iter().flatten().all(|&x| x.abs() < 1.0));
    }
}
