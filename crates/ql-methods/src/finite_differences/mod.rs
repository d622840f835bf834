//! Finite difference methods for one-dimensional pricing PDEs.
//!
//! # Overview
//!
//! * [`TridiagonalOperator`]: banded operator with boundary conditions and
//!   an O(n) Thomas solver
//! * [`d_plus`], [`d_minus`], [`d_zero`], [`d_plus_d_minus`], [`BsmOperator`]:
//!   spatial discretisations
//! * [`Evolver`] and the [`FdScheme`] choices: backward time stepping
//! * [`StepCondition`]: early exercise and similar constraints
//! * [`FiniteDifferenceModel`]: rolls a value array back through time

mod boundary_condition;
mod bsm_operator;
mod evolvers;
mod model;
mod operators;
mod step_condition;
mod tridiagonal_operator;
mod value_at_center;

pub use boundary_condition::{BoundaryCondition, BoundaryConditionKind, BoundarySide};
pub use bsm_operator::{BsmOperator, VolatilityFn};
pub use evolvers::{
    BackwardEuler, CrankNicolson, Evolver, ExplicitEuler, FdScheme, ImplicitEuler, MixedScheme,
};
pub use model::FiniteDifferenceModel;
pub use operators::{d_minus, d_plus, d_plus_d_minus, d_zero};
pub use step_condition::{
    shift_grid_for_dividend, AmericanCondition, BermudanCondition, NullCondition, ShoutCondition,
    StepCondition,
};
pub use tridiagonal_operator::{TimeSetter, TridiagonalOperator};
pub use value_at_center::{
    first_derivative_at_center, second_derivative_at_center, value_at_center,
};
