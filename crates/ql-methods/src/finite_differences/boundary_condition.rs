//! Boundary conditions for tridiagonal operators.
//!
//! A condition is attached to one side of an operator and acts twice: once
//! on the result of applying the operator, and once on the edge row and
//! right-hand side before a solve.

use ql_core::Real;
use ql_math::Array;

/// Which edge of the grid a condition is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundarySide {
    /// First grid point.
    Lower,
    /// Last grid point.
    Upper,
}

/// Kind of a [`BoundaryCondition`], without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryConditionKind {
    /// No constraint; the operator's own edge row is used.
    None,
    /// Prescribed difference between the edge value and its neighbour.
    Neumann,
    /// Prescribed edge value.
    Dirichlet,
}

/// Boundary condition on one edge of the grid.
///
/// The Neumann value is the grid-scaled difference between the edge value
/// and its neighbour (`u[1] − u[0]` on the lower side, `u[n−1] − u[n−2]` on
/// the upper side), not the derivative itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BoundaryCondition {
    /// No constraint.
    #[default]
    None,
    /// Prescribed edge difference.
    Neumann(Real),
    /// Prescribed edge value.
    Dirichlet(Real),
}

impl BoundaryCondition {
    /// The kind of this condition.
    pub fn kind(&self) -> BoundaryConditionKind {
        match self {
            BoundaryCondition::None => BoundaryConditionKind::None,
            BoundaryCondition::Neumann(_) => BoundaryConditionKind::Neumann,
            BoundaryCondition::Dirichlet(_) => BoundaryConditionKind::Dirichlet,
        }
    }

    /// The prescribed value, if any.
    pub fn value(&self) -> Option<Real> {
        match *self {
            BoundaryCondition::None => None,
            BoundaryCondition::Neumann(v) | BoundaryCondition::Dirichlet(v) => Some(v),
        }
    }

    /// Return `true` for [`BoundaryCondition::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, BoundaryCondition::None)
    }

    /// Enforce the condition on `u`, the result of applying an operator.
    /// `u` must have at least two elements.
    pub(crate) fn apply_after_applying(&self, side: BoundarySide, u: &mut Array) {
        let n = u.size();
        match (*self, side) {
            (BoundaryCondition::None, _) => {}
            (BoundaryCondition::Neumann(v), BoundarySide::Lower) => u[0] = u[1] - v,
            (BoundaryCondition::Neumann(v), BoundarySide::Upper) => u[n - 1] = u[n - 2] + v,
            (BoundaryCondition::Dirichlet(v), BoundarySide::Lower) => u[0] = v,
            (BoundaryCondition::Dirichlet(v), BoundarySide::Upper) => u[n - 1] = v,
        }
    }

    /// Replace the edge row `(inner, edge)` of a system and its right-hand
    /// side so that the solution satisfies the condition.
    ///
    /// `inner` is the coefficient coupling the edge to its neighbour (the
    /// super-diagonal on the lower side, the sub-diagonal on the upper one)
    /// and `edge` the diagonal entry.
    pub(crate) fn apply_before_solving(
        &self,
        side: BoundarySide,
        edge: &mut Real,
        inner: &mut Real,
        rhs: &mut Real,
    ) {
        match (*self, side) {
            (BoundaryCondition::None, _) => {}
            (BoundaryCondition::Neumann(v), BoundarySide::Lower) => {
                // u[1] - u[0] = v
                *edge = -1.0;
                *inner = 1.0;
                *rhs = v;
            }
            (BoundaryCondition::Neumann(v), BoundarySide::Upper) => {
                // u[n-1] - u[n-2] = v
                *edge = 1.0;
                *inner = -1.0;
                *rhs = v;
            }
            (BoundaryCondition::Dirichlet(v), _) => {
                *edge = 1.0;
                *inner = 0.0;
                *rhs = v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_values() {
        assert_eq!(BoundaryCondition::default().kind(), BoundaryConditionKind::None);
        assert_eq!(BoundaryCondition::Neumann(0.5).value(), Some(0.5));
        assert_eq!(BoundaryCondition::None.value(), None);
    }

    #[test]
    fn after_applying_overwrites_edges() {
        let mut u = Array::from_slice(&[9.0, 2.0, 3.0, 9.0]);
        BoundaryCondition::Neumann(0.5).apply_after_applying(BoundarySide::Lower, &mut u);
        BoundaryCondition::Neumann(0.25).apply_after_applying(BoundarySide::Upper, &mut u);
        assert_eq!(u.as_slice(), &[1.5, 2.0, 3.0, 3.25]);
        BoundaryCondition::Dirichlet(7.0).apply_after_applying(BoundarySide::Upper, &mut u);
        assert_eq!(u[3], 7.0);
    }
}
