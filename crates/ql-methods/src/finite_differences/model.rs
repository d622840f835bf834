//! Backward rollback of a value array through time.

use tracing::{debug, instrument, warn};

use ql_core::errors::Result;
use ql_core::{ensure, Size, Time};
use ql_math::Array;

use super::evolvers::{Evolver, FdScheme};
use super::step_condition::StepCondition;
use super::tridiagonal_operator::TridiagonalOperator;

/// Drives an [`Evolver`] backward from one time to an earlier one.
#[derive(Debug)]
pub struct FiniteDifferenceModel<E = Box<dyn Evolver>> {
    evolver: E,
}

impl FiniteDifferenceModel<Box<dyn Evolver>> {
    /// Model evolving operator `d` with the given scheme.
    pub fn from_operator(d: TridiagonalOperator, scheme: FdScheme) -> Self {
        Self::new(scheme.evolver(d))
    }
}

impl<E: Evolver> FiniteDifferenceModel<E> {
    /// Model driving `evolver`.
    pub fn new(evolver: E) -> Self {
        Self { evolver }
    }

    /// Borrow the evolver.
    pub fn evolver(&self) -> &E {
        &self.evolver
    }

    /// Evolve `a` from time `from` back to `to` in `steps` equal steps,
    /// applying `condition` after each one.
    ///
    /// On error `a` is left as it was and a time-dependent operator is
    /// moved back to `from`.
    #[instrument(level = "debug", skip(self, a, condition), fields(size = a.size()))]
    pub fn rollback(
        &mut self,
        a: &mut Array,
        from: Time,
        to: Time,
        steps: Size,
        condition: Option<&dyn StepCondition>,
    ) -> Result<()> {
        ensure!(from > to, "rollback must go backward in time (from {from} to {to})");
        ensure!(steps > 0, "rollback needs at least one step");
        let dt = (from - to) / steps as Time;
        self.evolver.set_step(dt)?;
        debug!(from, to, steps, dt, "rollback start");

        let mut work = a.clone();
        if let Err(e) = self.evolve(&mut work, from, to, steps, dt, condition) {
            if let Err(reset) = self.evolver.set_time(from) {
                warn!(error = %reset, time = from, "operator could not be reset");
            }
            return Err(e);
        }
        debug!(from, to, steps, dt, "rollback complete");
        *a = work;
        Ok(())
    }

    fn evolve(
        &mut self,
        work: &mut Array,
        from: Time,
        to: Time,
        steps: Size,
        dt: Time,
        condition: Option<&dyn StepCondition>,
    ) -> Result<()> {
        let mut t = from;
        for i in 0..steps {
            self.evolver.step(work, t)?;
            // the last step lands on `to` exactly
            t = if i + 1 == steps { to } else { t - dt };
            if let Some(condition) = condition {
                condition.apply_to(work, t)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::bsm_operator::BsmOperator;
    use crate::finite_differences::evolvers::CrankNicolson;
    use crate::finite_differences::step_condition::AmericanCondition;
    use ql_core::Error;
    use std::sync::Arc;

    fn decay(rate: f64) -> TridiagonalOperator {
        &TridiagonalOperator::identity(3).unwrap() * rate
    }

    #[test]
    fn rejects_bad_ranges_without_mutating() {
        let mut m = FiniteDifferenceModel::from_operator(decay(0.1), FdScheme::BackwardEuler);
        let mut a = Array::from_element(3, 1.0);
        assert!(matches!(m.rollback(&mut a, 0.0, 1.0, 10, None), Err(Error::Precondition(_))));
        assert!(matches!(m.rollback(&mut a, 1.0, 0.0, 0, None), Err(Error::Precondition(_))));
        assert_eq!(a.as_slice(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn failed_condition_leaves_input_intact() {
        let mut m = FiniteDifferenceModel::from_operator(decay(0.1), FdScheme::CrankNicolson);
        let mut a = Array::from_element(3, 1.0);
        let bad = AmericanCondition::new(Array::zeros(5));
        assert!(m.rollback(&mut a, 1.0, 0.0, 4, Some(&bad)).is_err());
        assert_eq!(a.as_slice(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn discounting_converges() {
        let r = 0.05;
        let mut m = FiniteDifferenceModel::from_operator(decay(r), FdScheme::CrankNicolson);
        let mut a = Array::from_element(3, 100.0);
        m.rollback(&mut a, 2.0, 0.0, 200, None).unwrap();
        assert!((a[1] - 100.0 * (-r * 2.0_f64).exp()).abs() < 1e-4);
    }

    #[test]
    fn condition_applied_at_each_time() {
        let mut m = FiniteDifferenceModel::from_operator(decay(1.0), FdScheme::BackwardEuler);
        let floor = AmericanCondition::new(Array::from_element(3, 0.9));
        let mut a = Array::from_element(3, 1.0);
        m.rollback(&mut a, 5.0, 0.0, 50, Some(&floor)).unwrap();
        assert!(a.iter().all(|&v| (v - 0.9).abs() < 1e-15 || v > 0.9));
        assert!((a[0] - 0.9).abs() < 1e-15);
    }

    #[test]
    fn failed_rollback_resets_time_dependent_operator() {
        // the volatility turns invalid partway through the rollback
        let vol = |t: Time| if (0.3..0.5).contains(&t) { -1.0 } else { 0.2 + 0.1 * t };
        let op = BsmOperator::time_dependent(5, 0.1, 0.05, 0.0, Arc::new(vol)).unwrap();
        let mut m = FiniteDifferenceModel::new(CrankNicolson::new(op));
        let mut a = Array::from_element(5, 1.0);
        assert!(m.rollback(&mut a, 1.0, 0.0, 10, None).is_err());
        assert_eq!(a.as_slice(), &[1.0; 5]);

        let at_start = BsmOperator::log_space(5, 0.1, 0.05, 0.0, vol(1.0)).unwrap();
        assert_eq!(m.evolver().operator().diagonal(), at_start.diagonal());
        assert_eq!(m.evolver().operator().lower(), at_start.lower());
    }
}
