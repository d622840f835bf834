//! `Array`: a one-dimensional vector of reals.
//!
//! A newtype around `nalgebra::DVector<f64>` with value semantics. The
//! operator overloads panic on a length mismatch, as nalgebra does; each has a
//! `try_*` counterpart returning [`Error::InvalidArgument`] instead.

use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use nalgebra::DVector;
use ql_core::errors::{Error, Result};
use ql_core::{ensure_arg, Real, Size};

/// A dynamically-sized 1D vector of `Real` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Array(DVector<Real>);

impl Array {
    /// Zero-filled array of length `n`.
    pub fn zeros(n: Size) -> Self {
        Self(DVector::zeros(n))
    }

    /// Zero-filled array of length `n`, reporting allocation failure as
    /// [`Error::Allocation`] instead of aborting.
    pub fn try_zeros(n: Size) -> Result<Self> {
        let mut data: Vec<Real> = Vec::new();
        data.try_reserve_exact(n)
            .map_err(|_| Error::Allocation { requested: n })?;
        data.resize(n, 0.0);
        Ok(Self(DVector::from_vec(data)))
    }

    /// Array of length `n` filled with `value`.
    pub fn from_element(n: Size, value: Real) -> Self {
        Self(DVector::from_element(n, value))
    }

    /// Copy of a slice.
    pub fn from_slice(data: &[Real]) -> Self {
        Self(DVector::from_column_slice(data))
    }

    /// Take ownership of a `Vec`.
    pub fn from_vec(data: Vec<Real>) -> Self {
        Self(DVector::from_vec(data))
    }

    /// Array of length `n` with `f(i)` at index `i`.
    pub fn from_fn<F: FnMut(Size) -> Real>(n: Size, mut f: F) -> Self {
        Self(DVector::from_fn(n, |i, _| f(i)))
    }

    /// Number of elements.
    pub fn size(&self) -> Size {
        self.0.len()
    }

    /// Return `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bounds-checked element access.
    pub fn get(&self, i: Size) -> Result<Real> {
        self.0.get(i).copied().ok_or(Error::IndexOutOfRange {
            index: i,
            size: self.size(),
        })
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[Real] {
        self.0.as_slice()
    }

    /// The elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [Real] {
        self.0.as_mut_slice()
    }

    /// Borrow the inner `DVector`.
    pub fn inner(&self) -> &DVector<Real> {
        &self.0
    }

    /// Consume and return the inner `DVector`.
    pub fn into_inner(self) -> DVector<Real> {
        self.0
    }

    /// Copy the elements into a `Vec`.
    pub fn to_vec(&self) -> Vec<Real> {
        self.as_slice().to_vec()
    }

    /// Iterator over elements.
    pub fn iter(&self) -> impl Iterator<Item = &Real> {
        self.0.iter()
    }

    /// Mutable iterator over elements.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Real> {
        self.0.iter_mut()
    }

    /// Sum of all elements.
    pub fn sum(&self) -> Real {
        self.0.sum()
    }

    /// Smallest element (`+inf` when empty).
    pub fn min(&self) -> Real {
        self.iter().copied().fold(Real::INFINITY, Real::min)
    }

    /// Largest element (`-inf` when empty).
    pub fn max(&self) -> Real {
        self.iter().copied().fold(Real::NEG_INFINITY, Real::max)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> Real {
        self.0.norm()
    }

    /// Inner product. Panics if the lengths differ.
    pub fn dot(&self, other: &Array) -> Real {
        self.0.dot(&other.0)
    }

    /// Apply `f` element-wise, returning a new array.
    pub fn map<F: Fn(Real) -> Real>(&self, f: F) -> Self {
        Self(self.0.map(f))
    }

    /// Element-wise combination of two arrays of equal length.
    pub fn zip_map<F: Fn(Real, Real) -> Real>(&self, other: &Array, f: F) -> Result<Self> {
        self.check_size(other, "combine")?;
        Ok(Self(self.0.zip_map(&other.0, f)))
    }

    // ── Checked arithmetic ───────────────────────────────────────────────

    /// `self + other`, failing on a length mismatch.
    pub fn try_add(&self, other: &Array) -> Result<Self> {
        self.check_size(other, "add")?;
        Ok(self + other)
    }

    /// `self - other`, failing on a length mismatch.
    pub fn try_sub(&self, other: &Array) -> Result<Self> {
        self.check_size(other, "subtract")?;
        Ok(self - other)
    }

    /// Element-wise product, failing on a length mismatch.
    pub fn try_mul(&self, other: &Array) -> Result<Self> {
        self.check_size(other, "multiply")?;
        Ok(self * other)
    }

    /// Element-wise quotient, failing on a length mismatch.
    pub fn try_div(&self, other: &Array) -> Result<Self> {
        self.check_size(other, "divide")?;
        Ok(self / other)
    }

    /// Inner product, failing on a length mismatch.
    pub fn try_dot(&self, other: &Array) -> Result<Real> {
        self.check_size(other, "take the dot product of")?;
        Ok(self.dot(other))
    }

    fn check_size(&self, other: &Array, op: &str) -> Result<()> {
        ensure_arg!(
            self.size() == other.size(),
            "cannot {op} arrays with different sizes ({}, {})",
            self.size(),
            other.size()
        );
        Ok(())
    }
}

impl Default for Array {
    fn default() -> Self {
        Self::zeros(0)
    }
}

// ── From / Into conversions ───────────────────────────────────────────────────

impl From<DVector<Real>> for Array {
    fn from(v: DVector<Real>) -> Self {
        Self(v)
    }
}

impl From<Array> for DVector<Real> {
    fn from(a: Array) -> Self {
        a.0
    }
}

impl From<Vec<Real>> for Array {
    fn from(v: Vec<Real>) -> Self {
        Self::from_vec(v)
    }
}

impl From<&[Real]> for Array {
    fn from(s: &[Real]) -> Self {
        Self::from_slice(s)
    }
}

impl FromIterator<Real> for Array {
    fn from_iter<I: IntoIterator<Item = Real>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

// ── Index ─────────────────────────────────────────────────────────────────────

impl Index<Size> for Array {
    type Output = Real;
    fn index(&self, i: Size) -> &Real {
        &self.0[i]
    }
}

impl IndexMut<Size> for Array {
    fn index_mut(&mut self, i: Size) -> &mut Real {
        &mut self.0[i]
    }
}

// ── Element-wise arithmetic ───────────────────────────────────────────────────

macro_rules! array_array_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $f:expr) => {
        impl $trait<&Array> for &Array {
            type Output = Array;
            fn $method(self, rhs: &Array) -> Array {
                assert_eq!(self.size(), rhs.size(), "array sizes differ");
                Array(self.0.zip_map(&rhs.0, $f))
            }
        }

        impl $trait<Array> for Array {
            type Output = Array;
            fn $method(self, rhs: Array) -> Array {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&Array> for Array {
            type Output = Array;
            fn $method(self, rhs: &Array) -> Array {
                (&self).$method(rhs)
            }
        }

        impl $assign_trait<&Array> for Array {
            fn $assign_method(&mut self, rhs: &Array) {
                assert_eq!(self.size(), rhs.size(), "array sizes differ");
                self.0.zip_apply(&rhs.0, |a, b| *a = ($f)(*a, b));
            }
        }
    };
}

array_array_op!(Add, add, AddAssign, add_assign, |a: Real, b: Real| a + b);
array_array_op!(Sub, sub, SubAssign, sub_assign, |a: Real, b: Real| a - b);
array_array_op!(Mul, mul, MulAssign, mul_assign, |a: Real, b: Real| a * b);
array_array_op!(Div, div, DivAssign, div_assign, |a: Real, b: Real| a / b);

macro_rules! array_scalar_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $f:expr) => {
        impl $trait<Real> for &Array {
            type Output = Array;
            fn $method(self, rhs: Real) -> Array {
                Array(self.0.map(|a| ($f)(a, rhs)))
            }
        }

        impl $trait<Real> for Array {
            type Output = Array;
            fn $method(mut self, rhs: Real) -> Array {
                self.0.apply(|a| *a = ($f)(*a, rhs));
                self
            }
        }

        impl $assign_trait<Real> for Array {
            fn $assign_method(&mut self, rhs: Real) {
                self.0.apply(|a| *a = ($f)(*a, rhs));
            }
        }
    };
}

array_scalar_op!(Add, add, AddAssign, add_assign, |a: Real, b: Real| a + b);
array_scalar_op!(Sub, sub, SubAssign, sub_assign, |a: Real, b: Real| a - b);
array_scalar_op!(Mul, mul, MulAssign, mul_assign, |a: Real, b: Real| a * b);
array_scalar_op!(Div, div, DivAssign, div_assign, |a: Real, b: Real| a / b);

impl Mul<&Array> for Real {
    type Output = Array;
    fn mul(self, rhs: &Array) -> Array {
        rhs * self
    }
}

impl Mul<Array> for Real {
    type Output = Array;
    fn mul(self, rhs: Array) -> Array {
        rhs * self
    }
}

impl Neg for &Array {
    type Output = Array;
    fn neg(self) -> Array {
        Array(-&self.0)
    }
}

impl Neg for Array {
    type Output = Array;
    fn neg(self) -> Array {
        Array(-self.0)
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl std::fmt::Display for Array {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}
