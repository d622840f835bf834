//! Evaluation of discounted payoffs on sampled paths.

use std::marker::PhantomData;

use ql_core::Real;

/// Computes the discounted payoff of one sampled path.
pub trait PathPricer<P>: Send + Sync {
    /// Discounted payoff of `path`.
    fn value(&self, path: &P) -> Real;
}

impl<P, F> PathPricer<P> for F
where
    F: Fn(&P) -> Real + Send + Sync,
{
    fn value(&self, path: &P) -> Real {
        self(path)
    }
}

/// Control-variate pricer: `target(path) − control(path) + control_value`,
/// where `control_value` is the known expectation of `control`.
pub struct ControlVariatedPathPricer<P, T, C> {
    target: T,
    control: C,
    control_value: Real,
    _path: PhantomData<fn(&P)>,
}

impl<P, T, C> ControlVariatedPathPricer<P, T, C>
where
    T: PathPricer<P>,
    C: PathPricer<P>,
{
    /// Combine `target` with `control`, whose exact price is `control_value`.
    pub fn new(target: T, control: C, control_value: Real) -> Self {
        Self {
            target,
            control,
            control_value,
            _path: PhantomData,
        }
    }
}

impl<P, T, C> PathPricer<P> for ControlVariatedPathPricer<P, T, C>
where
    T: PathPricer<P>,
    C: PathPricer<P>,
{
    fn value(&self, path: &P) -> Real {
        self.target.value(path) - self.control.value(path) + self.control_value
    }
}
