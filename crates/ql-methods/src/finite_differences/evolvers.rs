//! Time-stepping schemes for `∂u/∂t = L·u`, marching backward in time.
//!
//! With `D = −L`, one step of size `dt` under the θ-scheme solves
//! `(I + θ·dt·D)·u(t−dt) = (I − (1−θ)·dt·D)·u(t)`.

use ql_core::errors::{Error, Result};
use ql_core::{ensure, ensure_arg, Real, Time};
use ql_math::Array;

use super::tridiagonal_operator::TridiagonalOperator;

// ─── FD scheme selection ──────────────────────────────────────────────────────

/// Choice of time-stepping scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FdScheme {
    /// Fully explicit (θ = 0). Conditionally stable.
    ExplicitEuler,
    /// Fully implicit (θ = 1). Unconditionally stable, first order.
    BackwardEuler,
    /// θ = ½. Unconditionally stable, second order.
    #[default]
    CrankNicolson,
}

impl FdScheme {
    /// Implicitness parameter θ.
    pub fn theta(self) -> Real {
        match self {
            FdScheme::ExplicitEuler => 0.0,
            FdScheme::BackwardEuler => 1.0,
            FdScheme::CrankNicolson => 0.5,
        }
    }

    /// Boxed evolver for operator `d`.
    pub fn evolver(self, d: TridiagonalOperator) -> Box<dyn Evolver> {
        match self {
            FdScheme::ExplicitEuler => Box::new(ExplicitEuler::new(d)),
            FdScheme::BackwardEuler => Box::new(BackwardEuler::new(d)),
            FdScheme::CrankNicolson => Box::new(CrankNicolson::new(d)),
        }
    }
}

// ─── Evolver trait ────────────────────────────────────────────────────────────

/// One-step backward evolution.
pub trait Evolver: Send {
    /// Fix the step size. Must be called before [`step`](Self::step).
    fn set_step(&mut self, dt: Time) -> Result<()>;

    /// Evolve `a` from `t` to `t − dt` in place.
    fn step(&mut self, a: &mut Array, t: Time) -> Result<()>;

    /// Move a time-dependent operator to `t`. A no-op for constant operators.
    fn set_time(&mut self, _t: Time) -> Result<()> {
        Ok(())
    }
}

impl<E: Evolver + ?Sized> Evolver for Box<E> {
    fn set_step(&mut self, dt: Time) -> Result<()> {
        (**self).set_step(dt)
    }

    fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        (**self).step(a, t)
    }

    fn set_time(&mut self, t: Time) -> Result<()> {
        (**self).set_time(t)
    }
}

// ─── θ-scheme ─────────────────────────────────────────────────────────────────

/// Generic θ-scheme; the named schemes below fix θ.
#[derive(Debug, Clone)]
pub struct MixedScheme {
    d: TridiagonalOperator,
    theta: Real,
    dt: Option<Time>,
    explicit_part: Option<TridiagonalOperator>,
    implicit_part: Option<TridiagonalOperator>,
}

impl MixedScheme {
    /// Scheme with implicitness `theta ∈ [0, 1]`.
    pub fn new(d: TridiagonalOperator, theta: Real) -> Result<Self> {
        ensure_arg!((0.0..=1.0).contains(&theta), "theta must lie in [0, 1], got {theta}");
        Ok(Self::with_theta(d, theta))
    }

    fn with_theta(d: TridiagonalOperator, theta: Real) -> Self {
        Self {
            d,
            theta,
            dt: None,
            explicit_part: None,
            implicit_part: None,
        }
    }

    /// The operator being evolved.
    pub fn operator(&self) -> &TridiagonalOperator {
        &self.d
    }

    /// Implicitness parameter.
    pub fn theta(&self) -> Real {
        self.theta
    }

    fn rebuild(&mut self, dt: Time) -> Result<()> {
        let identity = TridiagonalOperator::identity(self.d.size())?;
        self.explicit_part = if self.theta < 1.0 {
            Some(identity.try_sub(&(&self.d * ((1.0 - self.theta) * dt)))?)
        } else {
            None
        };
        self.implicit_part = if self.theta > 0.0 {
            Some(identity.try_add(&(&self.d * (self.theta * dt)))?)
        } else {
            None
        };
        Ok(())
    }
}

impl Evolver for MixedScheme {
    fn set_step(&mut self, dt: Time) -> Result<()> {
        ensure_arg!(dt > 0.0 && dt.is_finite(), "time step must be positive, got {dt}");
        self.dt = Some(dt);
        self.rebuild(dt)
    }

    fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        let Some(dt) = self.dt else {
            return Err(Error::Precondition("set_step must be called before step".into()));
        };
        if self.d.is_time_dependent() {
            self.d.set_time(t)?;
            self.rebuild(dt)?;
        }
        if let Some(explicit) = &self.explicit_part {
            *a = explicit.apply_to(a)?;
        }
        if let Some(implicit) = &self.implicit_part {
            *a = implicit.solve_for(a)?;
        }
        ensure!(a.iter().all(|x| x.is_finite()), "evolution produced non-finite values at t = {t}");
        Ok(())
    }

    fn set_time(&mut self, t: Time) -> Result<()> {
        if !self.d.is_time_dependent() {
            return Ok(());
        }
        self.d.set_time(t)?;
        match self.dt {
            Some(dt) => self.rebuild(dt),
            None => Ok(()),
        }
    }
}

macro_rules! named_scheme {
    ($(#[$doc:meta])* $name:ident, $theta:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name(MixedScheme);

        impl $name {
            /// Evolver for operator `d`.
            pub fn new(d: TridiagonalOperator) -> Self {
                Self(MixedScheme::with_theta(d, $theta))
            }

            /// The operator being evolved.
            pub fn operator(&self) -> &TridiagonalOperator {
                self.0.operator()
            }
        }

        impl Evolver for $name {
            fn set_step(&mut self, dt: Time) -> Result<()> {
                self.0.set_step(dt)
            }

            fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
                self.0.step(a, t)
            }

            fn set_time(&mut self, t: Time) -> Result<()> {
                self.0.set_time(t)
            }
        }
    };
}

named_scheme!(
    /// Explicit Euler: `u(t−dt) = (I − dt·D)·u(t)`.
    ExplicitEuler,
    0.0
);
named_scheme!(
    /// Backward (implicit) Euler: `(I + dt·D)·u(t−dt) = u(t)`.
    BackwardEuler,
    1.0
);
named_scheme!(
    /// Crank-Nicolson: `(I + dt/2·D)·u(t−dt) = (I − dt/2·D)·u(t)`.
    CrankNicolson,
    0.5
);

/// Alias of [`BackwardEuler`].
pub type ImplicitEuler = BackwardEuler;
