//! Matrix factorisations used by the multi-asset path generators.

use nalgebra::DMatrix;
use ql_core::errors::{Error, Result};
use ql_core::{ensure_arg, Real};

use crate::array::Array;
use crate::matrix::Matrix;

/// Lower-triangular `L` with `L·Lᵀ = m` for a symmetric positive-definite `m`.
pub fn cholesky_decomposition(m: &Matrix) -> Result<Matrix> {
    ensure_arg!(m.is_square(), "matrix must be square, got {}x{}", m.rows(), m.cols());
    m.inner()
        .clone()
        .cholesky()
        .map(|c| Matrix::from(c.l()))
        .ok_or_else(|| Error::Numerical("matrix is not positive definite".into()))
}

/// Pseudo square root `S` of a symmetric matrix, with `S·Sᵀ ≈ m`.
///
/// Built from the symmetric eigen decomposition `m = V·D·Vᵀ` as
/// `S = V·sqrt(max(D, 0))`. Negative eigenvalues, which arise from
/// correlation estimates that are not quite positive semi-definite, are
/// clipped to zero.
pub fn pseudo_sqrt(m: &Matrix) -> Result<Matrix> {
    ensure_arg!(m.is_square(), "matrix must be square, got {}x{}", m.rows(), m.cols());
    let n = m.rows();
    for i in 0..n {
        for j in 0..i {
            let (a, b) = (m[(i, j)], m[(j, i)]);
            ensure_arg!(
                (a - b).abs() <= 1e-10 * (1.0 + a.abs().max(b.abs())),
                "matrix is not symmetric at ({i}, {j}): {a} vs {b}"
            );
        }
    }
    let eigen = m.inner().clone().symmetric_eigen();
    let root = DMatrix::from_fn(n, n, |i, j| {
        eigen.eigenvectors[(i, j)] * eigen.eigenvalues[j].max(0.0).sqrt()
    });
    Ok(Matrix::from(root))
}

/// Covariance `C_ij = σ_i ρ_ij σ_j` from volatilities and a correlation matrix.
pub fn get_covariance(volatilities: &Array, correlation: &Matrix) -> Result<Matrix> {
    let n = volatilities.size();
    ensure_arg!(
        correlation.rows() == n && correlation.cols() == n,
        "correlation matrix must be {n}x{n}, got {}x{}",
        correlation.rows(),
        correlation.cols()
    );
    let vols: Vec<Real> = volatilities.to_vec();
    Ok(Matrix::from(DMatrix::from_fn(n, n, |i, j| {
        vols[i] * correlation[(i, j)] * vols[j]
    })))
}
