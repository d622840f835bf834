use ql_core::errors::Result;
use ql_core::{ensure_arg, Real};

use super::{RandomNumberGenerator, Sample};
use crate::array::Array;
use crate::matrix::Matrix;
use crate::matrix_utilities::pseudo_sqrt;

/// Correlated Gaussian vectors.
///
/// Draws independent standard deviates `z` from the wrapped generator and
/// returns `S·z`, where `S` is the pseudo square root of the covariance.
/// The weight is the product of the individual weights.
#[derive(Debug, Clone)]
pub struct RandomArrayGenerator<G> {
    generator: G,
    sqrt_covariance: Matrix,
}

impl<G: RandomNumberGenerator> RandomArrayGenerator<G> {
    /// Generator for vectors with the given covariance matrix.
    pub fn new(covariance: &Matrix, generator: G) -> Result<Self> {
        ensure_arg!(covariance.rows() > 0, "empty covariance matrix");
        Ok(Self {
            generator,
            sqrt_covariance: pseudo_sqrt(covariance)?,
        })
    }

    /// Generator for vectors of independent deviates with the given variances.
    pub fn with_variances(variances: &Array, generator: G) -> Result<Self> {
        ensure_arg!(
            variances.iter().all(|v| *v >= 0.0),
            "variances must be non-negative"
        );
        let n = variances.size();
        let mut cov = Matrix::zeros(n, n);
        for i in 0..n {
            cov[(i, i)] = variances[i];
        }
        Self::new(&cov, generator)
    }

    /// Dimension of the generated vectors.
    pub fn dimension(&self) -> usize {
        self.sqrt_covariance.rows()
    }

    /// The next correlated vector.
    pub fn next(&mut self) -> Sample<Array> {
        let mut weight: Real = 1.0;
        let z: Array = (0..self.sqrt_covariance.cols())
            .map(|_| {
                let s = self.generator.next();
                weight *= s.weight;
                s.value
            })
            .collect();
        Sample::new(self.sqrt_covariance.mul_vec(&z), weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random_numbers::{GaussianRandomGenerator, SeedableGenerator};

    #[test]
    fn sample_covariance_matches_target() {
        let cov = Matrix::from_row_slice(2, 2, &[0.04, 0.018, 0.018, 0.09]);
        let mut g =
            RandomArrayGenerator::new(&cov, GaussianRandomGenerator::with_seed(11)).unwrap();
        assert_eq!(g.dimension(), 2);
        let n = 50_000;
        let mut acc = [[0.0; 2]; 2];
        for _ in 0..n {
            let x = g.next().value;
            for i in 0..2 {
                for j in 0..2 {
                    acc[i][j] += x[i] * x[j];
                }
            }
        }
        for i in 0..2 {
            for j in 0..2 {
                let est = acc[i][j] / n as Real;
                assert!((est - cov[(i, j)]).abs() < 0.004, "({i},{j}): {est}");
            }
        }
    }
}
