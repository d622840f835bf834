//! Tridiagonal operators on a uniform one-dimensional grid.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use ql_core::errors::{Error, Result};
use ql_core::{ensure_arg, Real, Size, Time};
use ql_math::Array;

use super::boundary_condition::{BoundaryCondition, BoundarySide};

/// Recomputes the bands of a time-dependent operator.
pub trait TimeSetter: fmt::Debug + Send + Sync {
    /// Set the coefficients of `op` to their values at time `t`.
    fn set_time(&self, t: Time, op: &mut TridiagonalOperator) -> Result<()>;
}

/// A square tridiagonal operator.
///
/// Stored as three bands: `lower` (sub-diagonal, `n−1` entries), `diagonal`
/// (`n` entries) and `upper` (super-diagonal, `n−1` entries). Each edge may
/// carry a [`BoundaryCondition`], honoured by [`apply_to`](Self::apply_to)
/// and [`solve_for`](Self::solve_for).
///
/// An operator is time dependent when a [`TimeSetter`] is installed; for
/// any other operator [`set_time`](Self::set_time) does nothing.
#[derive(Clone)]
pub struct TridiagonalOperator {
    lower: Array,
    diagonal: Array,
    upper: Array,
    lower_bc: BoundaryCondition,
    upper_bc: BoundaryCondition,
    time_setter: Option<Arc<dyn TimeSetter>>,
}

impl TridiagonalOperator {
    /// The zero operator on a grid of `size ≥ 3` points.
    pub fn new(size: Size) -> Result<Self> {
        ensure_arg!(size >= 3, "invalid size ({size}) for tridiagonal operator (must be >= 3)");
        Ok(Self {
            lower: Array::try_zeros(size - 1)?,
            diagonal: Array::try_zeros(size)?,
            upper: Array::try_zeros(size - 1)?,
            lower_bc: BoundaryCondition::None,
            upper_bc: BoundaryCondition::None,
            time_setter: None,
        })
    }

    /// The identity operator on `size ≥ 3` points.
    pub fn identity(size: Size) -> Result<Self> {
        let mut op = Self::new(size)?;
        op.diagonal = Array::from_element(size, 1.0);
        Ok(op)
    }

    /// Build from explicit bands.
    pub fn from_bands(lower: Array, diagonal: Array, upper: Array) -> Result<Self> {
        let n = diagonal.size();
        ensure_arg!(n >= 3, "invalid size ({n}) for tridiagonal operator (must be >= 3)");
        ensure_arg!(
            lower.size() == n - 1,
            "wrong size for lower diagonal vector ({}, expected {})",
            lower.size(),
            n - 1
        );
        ensure_arg!(
            upper.size() == n - 1,
            "wrong size for upper diagonal vector ({}, expected {})",
            upper.size(),
            n - 1
        );
        Ok(Self {
            lower,
            diagonal,
            upper,
            lower_bc: BoundaryCondition::None,
            upper_bc: BoundaryCondition::None,
            time_setter: None,
        })
    }

    // ─── Inspectors ──────────────────────────────────────────────────────

    /// Number of grid points.
    pub fn size(&self) -> Size {
        self.diagonal.size()
    }

    /// Sub-diagonal band.
    pub fn lower(&self) -> &Array {
        &self.lower
    }

    /// Main diagonal band.
    pub fn diagonal(&self) -> &Array {
        &self.diagonal
    }

    /// Super-diagonal band.
    pub fn upper(&self) -> &Array {
        &self.upper
    }

    /// Condition on the first grid point.
    pub fn lower_bc(&self) -> BoundaryCondition {
        self.lower_bc
    }

    /// Condition on the last grid point.
    pub fn upper_bc(&self) -> BoundaryCondition {
        self.upper_bc
    }

    /// Return `true` if a [`TimeSetter`] is installed.
    pub fn is_time_dependent(&self) -> bool {
        self.time_setter.is_some()
    }

    // ─── Modifiers ───────────────────────────────────────────────────────

    /// Set the first row to `(b, c)`.
    pub fn set_first_row(&mut self, b: Real, c: Real) {
        self.diagonal[0] = b;
        self.upper[0] = c;
    }

    /// Set row `i` (`1 ≤ i ≤ n−2`) to `(a, b, c)`.
    pub fn set_mid_row(&mut self, i: Size, a: Real, b: Real, c: Real) -> Result<()> {
        let n = self.size();
        if i == 0 || i + 1 >= n {
            return Err(Error::IndexOutOfRange { index: i, size: n });
        }
        self.lower[i - 1] = a;
        self.diagonal[i] = b;
        self.upper[i] = c;
        Ok(())
    }

    /// Set every interior row to `(a, b, c)`.
    pub fn set_mid_rows(&mut self, a: Real, b: Real, c: Real) {
        let n = self.size();
        for i in 1..n.saturating_sub(1) {
            self.lower[i - 1] = a;
            self.diagonal[i] = b;
            self.upper[i] = c;
        }
    }

    /// Set the last row to `(a, b)`.
    pub fn set_last_row(&mut self, a: Real, b: Real) {
        let n = self.size();
        self.lower[n - 2] = a;
        self.diagonal[n - 1] = b;
    }

    /// Attach a condition to the first grid point.
    pub fn set_lower_bc(&mut self, bc: BoundaryCondition) {
        self.lower_bc = bc;
    }

    /// Attach a condition to the last grid point.
    pub fn set_upper_bc(&mut self, bc: BoundaryCondition) {
        self.upper_bc = bc;
    }

    /// Install a [`TimeSetter`], making the operator time dependent.
    pub fn set_time_setter(&mut self, setter: Arc<dyn TimeSetter>) {
        self.time_setter = Some(setter);
    }

    /// Recompute the bands for time `t`; a no-op for time-independent operators.
    pub fn set_time(&mut self, t: Time) -> Result<()> {
        match self.time_setter.clone() {
            Some(setter) => setter.set_time(t, self),
            None => Ok(()),
        }
    }

    // ─── Linear algebra ──────────────────────────────────────────────────

    /// `D·v`, followed by the boundary conditions.
    pub fn apply_to(&self, v: &Array) -> Result<Array> {
        let n = self.size();
        ensure_arg!(
            v.size() == n,
            "vector of the wrong size ({}) instead of {n}",
            v.size()
        );
        let mut result = Array::try_zeros(n)?;
        result[0] = self.diagonal[0] * v[0] + self.upper[0] * v[1];
        for j in 1..n - 1 {
            result[j] = self.lower[j - 1] * v[j - 1]
                + self.diagonal[j] * v[j]
                + self.upper[j] * v[j + 1];
        }
        result[n - 1] = self.lower[n - 2] * v[n - 2] + self.diagonal[n - 1] * v[n - 1];
        self.lower_bc
            .apply_after_applying(BoundarySide::Lower, &mut result);
        self.upper_bc
            .apply_after_applying(BoundarySide::Upper, &mut result);
        Ok(result)
    }

    /// Solve `D·x = rhs` by the Thomas algorithm, with the edge rows replaced
    /// as the boundary conditions prescribe.
    pub fn solve_for(&self, rhs: &Array) -> Result<Array> {
        let n = self.size();
        ensure_arg!(
            rhs.size() == n,
            "rhs vector of the wrong size ({}) instead of {n}",
            rhs.size()
        );
        let mut rhs = rhs.clone();
        let (mut d0, mut c0) = (self.diagonal[0], self.upper[0]);
        let (mut dn, mut an) = (self.diagonal[n - 1], self.lower[n - 2]);
        self.lower_bc
            .apply_before_solving(BoundarySide::Lower, &mut d0, &mut c0, &mut rhs[0]);
        self.upper_bc
            .apply_before_solving(BoundarySide::Upper, &mut dn, &mut an, &mut rhs[n - 1]);

        let diag = |j: Size| {
            if j == 0 {
                d0
            } else if j == n - 1 {
                dn
            } else {
                self.diagonal[j]
            }
        };
        let above = |j: Size| if j == 0 { c0 } else { self.upper[j] };
        let below = |j: Size| if j == n - 2 { an } else { self.lower[j] };

        let mut tmp = Array::try_zeros(n)?;
        let mut result = Array::try_zeros(n)?;
        let mut bet = diag(0);
        if bet == 0.0 {
            return Err(Error::Numerical("division by zero in tridiagonal solve (row 0)".into()));
        }
        result[0] = rhs[0] / bet;
        for j in 1..n {
            tmp[j] = above(j - 1) / bet;
            bet = diag(j) - below(j - 1) * tmp[j];
            if bet == 0.0 {
                return Err(Error::Numerical(format!(
                    "division by zero in tridiagonal solve (row {j})"
                )));
            }
            result[j] = (rhs[j] - below(j - 1) * result[j - 1]) / bet;
        }
        for j in (0..n - 1).rev() {
            result[j] -= tmp[j + 1] * result[j + 1];
        }
        if !result.iter().all(|x| x.is_finite()) {
            return Err(Error::Numerical("non-finite value in tridiagonal solve".into()));
        }
        Ok(result)
    }

    /// `self + other`, failing on a size mismatch or when both operands
    /// carry a condition on the same edge.
    pub fn try_add(&self, other: &TridiagonalOperator) -> Result<Self> {
        self.check_compatible(other)?;
        Ok(self + other)
    }

    /// `self − other`, with the same checks as [`try_add`](Self::try_add).
    pub fn try_sub(&self, other: &TridiagonalOperator) -> Result<Self> {
        self.check_compatible(other)?;
        Ok(self - other)
    }

    fn check_compatible(&self, other: &TridiagonalOperator) -> Result<()> {
        ensure_arg!(
            self.size() == other.size(),
            "operators with different sizes ({}, {}) cannot be combined",
            self.size(),
            other.size()
        );
        ensure_arg!(
            self.lower_bc.is_none() || other.lower_bc.is_none(),
            "lower boundary conditions collide"
        );
        ensure_arg!(
            self.upper_bc.is_none() || other.upper_bc.is_none(),
            "upper boundary conditions collide"
        );
        Ok(())
    }

    fn combine(
        &self,
        other: &TridiagonalOperator,
        f: impl Fn(&Array, &Array) -> Array,
    ) -> TridiagonalOperator {
        assert_eq!(self.size(), other.size(), "operator sizes differ");
        let pick = |a: BoundaryCondition, b: BoundaryCondition| if a.is_none() { b } else { a };
        TridiagonalOperator {
            lower: f(&self.lower, &other.lower),
            diagonal: f(&self.diagonal, &other.diagonal),
            upper: f(&self.upper, &other.upper),
            lower_bc: pick(self.lower_bc, other.lower_bc),
            upper_bc: pick(self.upper_bc, other.upper_bc),
            time_setter: None,
        }
    }

    fn scaled(&self, factor: Real) -> TridiagonalOperator {
        TridiagonalOperator {
            lower: &self.lower * factor,
            diagonal: &self.diagonal * factor,
            upper: &self.upper * factor,
            lower_bc: self.lower_bc,
            upper_bc: self.upper_bc,
            time_setter: None,
        }
    }
}

impl fmt::Debug for TridiagonalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TridiagonalOperator")
            .field("lower", &self.lower)
            .field("diagonal", &self.diagonal)
            .field("upper", &self.upper)
            .field("lower_bc", &self.lower_bc)
            .field("upper_bc", &self.upper_bc)
            .field("time_dependent", &self.is_time_dependent())
            .finish()
    }
}

// ─── Operator algebra ─────────────────────────────────────────────────────────

impl Add for &TridiagonalOperator {
    type Output = TridiagonalOperator;
    fn add(self, rhs: &TridiagonalOperator) -> TridiagonalOperator {
        self.combine(rhs, |a, b| a + b)
    }
}

impl Sub for &TridiagonalOperator {
    type Output = TridiagonalOperator;
    fn sub(self, rhs: &TridiagonalOperator) -> TridiagonalOperator {
        self.combine(rhs, |a, b| a - b)
    }
}

impl Neg for &TridiagonalOperator {
    type Output = TridiagonalOperator;
    fn neg(self) -> TridiagonalOperator {
        self.scaled(-1.0)
    }
}

impl Mul<Real> for &TridiagonalOperator {
    type Output = TridiagonalOperator;
    fn mul(self, rhs: Real) -> TridiagonalOperator {
        self.scaled(rhs)
    }
}

impl Mul<&TridiagonalOperator> for Real {
    type Output = TridiagonalOperator;
    fn mul(self, rhs: &TridiagonalOperator) -> TridiagonalOperator {
        rhs.scaled(self)
    }
}

impl Div<Real> for &TridiagonalOperator {
    type Output = TridiagonalOperator;
    fn div(self, rhs: Real) -> TridiagonalOperator {
        self.scaled(1.0 / rhs)
    }
}
