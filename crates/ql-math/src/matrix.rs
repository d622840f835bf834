//! `Matrix`: a two-dimensional matrix of reals.
//!
//! A newtype around `nalgebra::DMatrix<f64>` addressed as `m[(row, col)]`.
//! Operators panic on non-conformal shapes; the `try_*` methods return
//! [`Error::InvalidArgument`] instead.

use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

use nalgebra::DMatrix;
use ql_core::errors::{Error, Result};
use ql_core::{ensure_arg, Real, Size};

use crate::array::Array;

/// A dynamically-sized 2D matrix of `Real` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix(DMatrix<Real>);

impl Matrix {
    /// Zero-filled `rows × cols` matrix.
    pub fn zeros(rows: Size, cols: Size) -> Self {
        Self(DMatrix::zeros(rows, cols))
    }

    /// Zero-filled `rows × cols` matrix, reporting allocation failure as
    /// [`Error::Allocation`].
    pub fn try_zeros(rows: Size, cols: Size) -> Result<Self> {
        let requested = rows.checked_mul(cols).ok_or(Error::Allocation {
            requested: usize::MAX,
        })?;
        let mut data: Vec<Real> = Vec::new();
        data.try_reserve_exact(requested)
            .map_err(|_| Error::Allocation { requested })?;
        data.resize(requested, 0.0);
        Ok(Self(DMatrix::from_vec(rows, cols, data)))
    }

    /// `rows × cols` matrix filled with `value`.
    pub fn from_element(rows: Size, cols: Size, value: Real) -> Self {
        Self(DMatrix::from_element(rows, cols, value))
    }

    /// `n × n` identity matrix.
    pub fn identity(n: Size) -> Self {
        Self(DMatrix::identity(n, n))
    }

    /// Build from row-major data. Panics if `data.len() != rows * cols`.
    pub fn from_row_slice(rows: Size, cols: Size, data: &[Real]) -> Self {
        Self(DMatrix::from_row_slice(rows, cols, data))
    }

    /// Build from a list of rows, which must all have the same length.
    pub fn from_rows(rows: &[Vec<Real>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        ensure_arg!(
            rows.iter().all(|r| r.len() == cols),
            "rows of a matrix must all have {cols} elements"
        );
        Ok(Self(DMatrix::from_fn(rows.len(), cols, |i, j| rows[i][j])))
    }

    /// `a · bᵀ`.
    pub fn outer_product(a: &Array, b: &Array) -> Self {
        Self(DMatrix::from_fn(a.size(), b.size(), |i, j| a[i] * b[j]))
    }

    /// Number of rows.
    pub fn rows(&self) -> Size {
        self.0.nrows()
    }

    /// Number of columns.
    pub fn cols(&self) -> Size {
        self.0.ncols()
    }

    /// Return `true` if the matrix is square.
    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Borrow the inner `DMatrix`.
    pub fn inner(&self) -> &DMatrix<Real> {
        &self.0
    }

    /// Consume and return the inner `DMatrix`.
    pub fn into_inner(self) -> DMatrix<Real> {
        self.0
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Copy of row `i`.
    pub fn row(&self, i: Size) -> Array {
        self.0.row(i).iter().copied().collect()
    }

    /// Copy of column `j`.
    pub fn column(&self, j: Size) -> Array {
        self.0.column(j).iter().copied().collect()
    }

    /// Copy of the main diagonal.
    pub fn diagonal(&self) -> Array {
        Array::from(self.0.diagonal())
    }

    /// Matrix-vector product. Panics if `v.size() != self.cols()`.
    pub fn mul_vec(&self, v: &Array) -> Array {
        Array::from(&self.0 * v.inner())
    }

    // ── Checked arithmetic ───────────────────────────────────────────────

    /// `self + other`, failing if the shapes differ.
    pub fn try_add(&self, other: &Matrix) -> Result<Self> {
        self.check_same_shape(other, "add")?;
        Ok(self + other)
    }

    /// `self - other`, failing if the shapes differ.
    pub fn try_sub(&self, other: &Matrix) -> Result<Self> {
        self.check_same_shape(other, "subtract")?;
        Ok(self - other)
    }

    /// Matrix product, failing if `self.cols() != other.rows()`.
    pub fn try_mul(&self, other: &Matrix) -> Result<Self> {
        ensure_arg!(
            self.cols() == other.rows(),
            "cannot multiply a {}x{} matrix by a {}x{} matrix",
            self.rows(),
            self.cols(),
            other.rows(),
            other.cols()
        );
        Ok(self * other)
    }

    /// Matrix-vector product, failing if `v.size() != self.cols()`.
    pub fn try_mul_vec(&self, v: &Array) -> Result<Array> {
        ensure_arg!(
            self.cols() == v.size(),
            "cannot multiply a {}x{} matrix by an array of size {}",
            self.rows(),
            self.cols(),
            v.size()
        );
        Ok(self.mul_vec(v))
    }

    fn check_same_shape(&self, other: &Matrix, op: &str) -> Result<()> {
        ensure_arg!(
            self.rows() == other.rows() && self.cols() == other.cols(),
            "cannot {op} a {}x{} matrix and a {}x{} matrix",
            self.rows(),
            self.cols(),
            other.rows(),
            other.cols()
        );
        Ok(())
    }
}

// ── From / Into ───────────────────────────────────────────────────────────────

impl From<DMatrix<Real>> for Matrix {
    fn from(m: DMatrix<Real>) -> Self {
        Self(m)
    }
}

impl From<Matrix> for DMatrix<Real> {
    fn from(m: Matrix) -> Self {
        m.0
    }
}

// ── Indexing ──────────────────────────────────────────────────────────────────

impl Index<(Size, Size)> for Matrix {
    type Output = Real;
    fn index(&self, ij: (Size, Size)) -> &Real {
        &self.0[ij]
    }
}

impl IndexMut<(Size, Size)> for Matrix {
    fn index_mut(&mut self, ij: (Size, Size)) -> &mut Real {
        &mut self.0[ij]
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────────

macro_rules! matrix_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<&Matrix> for &Matrix {
            type Output = Matrix;
            fn $method(self, rhs: &Matrix) -> Matrix {
                Matrix((&self.0).$method(&rhs.0))
            }
        }

        impl $trait<Matrix> for Matrix {
            type Output = Matrix;
            fn $method(self, rhs: Matrix) -> Matrix {
                Matrix(self.0.$method(rhs.0))
            }
        }
    };
}

matrix_binop!(Add, add);
matrix_binop!(Sub, sub);
matrix_binop!(Mul, mul);

impl Mul<Real> for &Matrix {
    type Output = Matrix;
    fn mul(self, rhs: Real) -> Matrix {
        Matrix(&self.0 * rhs)
    }
}

impl Mul<&Matrix> for Real {
    type Output = Matrix;
    fn mul(self, rhs: &Matrix) -> Matrix {
        rhs * self
    }
}

impl Div<Real> for &Matrix {
    type Output = Matrix;
    fn div(self, rhs: Real) -> Matrix {
        Matrix(&self.0 / rhs)
    }
}

impl Mul<&Array> for &Matrix {
    type Output = Array;
    fn mul(self, rhs: &Array) -> Array {
        self.mul_vec(rhs)
    }
}

impl Neg for &Matrix {
    type Output = Matrix;
    fn neg(self) -> Matrix {
        Matrix(-&self.0)
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl std::fmt::Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.rows() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "| ")?;
            for j in 0..self.cols() {
                write!(f, "{} ", self.0[(i, j)])?;
            }
            write!(f, "|")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiply_and_transpose() {
        let a = Matrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = Matrix::from_row_slice(2, 2, &[5.0, 6.0, 7.0, 8.0]);
        let c = &a * &b;
        assert_eq!(c, Matrix::from_row_slice(2, 2, &[19.0, 22.0, 43.0, 50.0]));
        let t = Matrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).transpose();
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert_eq!(t[(2, 1)], 6.0);
    }

    #[test]
    fn rows_columns_diagonal() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]])
            .unwrap();
        assert_eq!(m.row(1).as_slice(), &[4.0, 5.0, 6.0]);
        assert_eq!(m.column(2).as_slice(), &[3.0, 6.0, 9.0]);
        assert_eq!(m.diagonal().as_slice(), &[1.0, 5.0, 9.0]);
        assert!(Matrix::from_rows(&[vec![1.0], vec![1.0, 2.0]]).is_err());
    }

    #[test]
    fn matrix_vector_product() {
        let m = Matrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let v = Array::from_slice(&[1.0, 1.0, 1.0]);
        assert_eq!((&m * &v).as_slice(), &[6.0, 15.0]);
        assert!(matches!(
            m.try_mul_vec(&Array::zeros(2)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn checked_shapes() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(3, 2);
        assert!(a.try_add(&b).is_err());
        assert_eq!(a.try_mul(&b).unwrap().rows(), 2);
        assert!(b.try_mul(&Matrix::zeros(3, 3)).is_err());
        assert!(matches!(
            Matrix::try_zeros(usize::MAX, 2),
            Err(Error::Allocation { .. })
        ));
    }

    #[test]
    fn outer_product_and_scaling() {
        let a = Array::from_slice(&[1.0, 2.0]);
        let b = Array::from_slice(&[3.0, 4.0, 5.0]);
        let m = Matrix::outer_product(&a, &b);
        assert_eq!(m[(1, 2)], 10.0);
        let half = &m / 2.0;
        assert_eq!(half[(1, 2)], 5.0);
        assert_eq!((2.0 * &half)[(0, 0)], 3.0);
    }
}
