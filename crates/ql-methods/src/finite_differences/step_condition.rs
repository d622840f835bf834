//! Conditions applied to the solution after every backward step.

use ql_core::errors::Result;
use ql_core::{ensure_arg, Rate, Real, Time};
use ql_math::{Array, Interpolation1D, NaturalCubicSpline};

/// Condition applied to the value array after each evolution step.
pub trait StepCondition: Send + Sync {
    /// Modify `a`, the values at time `t`, in place.
    fn apply_to(&self, a: &mut Array, t: Time) -> Result<()>;
}

/// Leaves the values untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCondition;

impl StepCondition for NullCondition {
    fn apply_to(&self, _a: &mut Array, _t: Time) -> Result<()> {
        Ok(())
    }
}

fn check_size(a: &Array, intrinsic: &Array) -> Result<()> {
    ensure_arg!(
        a.size() == intrinsic.size(),
        "value array of size {} does not match intrinsic values of size {}",
        a.size(),
        intrinsic.size()
    );
    Ok(())
}

/// Early exercise: `a[i] = max(a[i], intrinsic[i])`.
#[derive(Debug, Clone)]
pub struct AmericanCondition {
    intrinsic: Array,
}

impl AmericanCondition {
    /// Condition against the given intrinsic values.
    pub fn new(intrinsic: Array) -> Self {
        Self { intrinsic }
    }

    /// The intrinsic values on the grid.
    pub fn intrinsic(&self) -> &Array {
        &self.intrinsic
    }
}

impl StepCondition for AmericanCondition {
    fn apply_to(&self, a: &mut Array, _t: Time) -> Result<()> {
        check_size(a, &self.intrinsic)?;
        for (v, &e) in a.iter_mut().zip(self.intrinsic.iter()) {
            *v = v.max(e);
        }
        Ok(())
    }
}

/// Shout right: the holder may lock in the intrinsic value at `t`, paid at
/// the residual time `T`, so `a[i] = max(a[i], e^{−r(T−t)}·intrinsic[i])`.
#[derive(Debug, Clone)]
pub struct ShoutCondition {
    intrinsic: Array,
    residual_time: Time,
    rate: Rate,
}

impl ShoutCondition {
    /// Condition against `intrinsic`, paid at `residual_time`, discounted at `rate`.
    pub fn new(intrinsic: Array, residual_time: Time, rate: Rate) -> Self {
        Self {
            intrinsic,
            residual_time,
            rate,
        }
    }
}

impl StepCondition for ShoutCondition {
    fn apply_to(&self, a: &mut Array, t: Time) -> Result<()> {
        check_size(a, &self.intrinsic)?;
        let discount = (-self.rate * (self.residual_time - t)).exp();
        for (v, &e) in a.iter_mut().zip(self.intrinsic.iter()) {
            *v = v.max(discount * e);
        }
        Ok(())
    }
}

/// Applies an inner condition only at a discrete set of exercise times.
#[derive(Debug, Clone)]
pub struct BermudanCondition<C> {
    inner: C,
    times: Vec<Time>,
    tolerance: Time,
}

impl<C: StepCondition> BermudanCondition<C> {
    /// Fire `inner` whenever `t` lies within `tolerance` of one of `times`.
    pub fn new(inner: C, mut times: Vec<Time>, tolerance: Time) -> Result<Self> {
        ensure_arg!(tolerance >= 0.0, "negative tolerance ({tolerance})");
        ensure_arg!(
            times.iter().all(|t| t.is_finite()),
            "exercise times must be finite"
        );
        times.sort_by(|a, b| a.total_cmp(b));
        Ok(Self {
            inner,
            times,
            tolerance,
        })
    }

    /// Sorted exercise times.
    pub fn exercise_times(&self) -> &[Time] {
        &self.times
    }

    fn is_exercise_time(&self, t: Time) -> bool {
        self.times.iter().any(|&e| (e - t).abs() <= self.tolerance)
    }
}

impl<C: StepCondition> StepCondition for BermudanCondition<C> {
    fn apply_to(&self, a: &mut Array, t: Time) -> Result<()> {
        if self.is_exercise_time(t) {
            self.inner.apply_to(a, t)
        } else {
            Ok(())
        }
    }
}

impl<C: StepCondition + ?Sized> StepCondition for &C {
    fn apply_to(&self, a: &mut Array, t: Time) -> Result<()> {
        (**self).apply_to(a, t)
    }
}

impl<C: StepCondition + ?Sized> StepCondition for Box<C> {
    fn apply_to(&self, a: &mut Array, t: Time) -> Result<()> {
        (**self).apply_to(a, t)
    }
}

/// Move `prices`, known on `old_grid`, onto `new_grid` across a dividend
/// date.
///
/// The values are interpolated with a natural cubic spline in log price and
/// extrapolated linearly past the ends of `old_grid`. Both grids must hold
/// positive, strictly increasing prices of the same length.
pub fn shift_grid_for_dividend(prices: &mut Array, new_grid: &Array, old_grid: &Array) -> Result<()> {
    ensure_arg!(
        prices.size() == old_grid.size() && new_grid.size() == old_grid.size(),
        "sizes differ: prices {}, new grid {}, old grid {}",
        prices.size(),
        new_grid.size(),
        old_grid.size()
    );
    ensure_arg!(
        old_grid.iter().chain(new_grid.iter()).all(|&s| s > 0.0),
        "price grids must be positive"
    );
    let log_old: Vec<Real> = old_grid.iter().map(|s| s.ln()).collect();
    let spline = NaturalCubicSpline::new(&log_old, prices.as_slice())?;
    for (p, s) in prices.iter_mut().zip(new_grid.iter()) {
        *p = spline.value(s.ln());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn american_takes_the_maximum() {
        let c = AmericanCondition::new(Array::from_slice(&[1.0, 2.0, 3.0]));
        let mut a = Array::from_slice(&[1.5, 1.5, 1.5]);
        c.apply_to(&mut a, 0.3).unwrap();
        assert_eq!(a.as_slice(), &[1.5, 2.0, 3.0]);
        assert!(c.apply_to(&mut Array::zeros(2), 0.0).is_err());
        NullCondition.apply_to(&mut a, 0.0).unwrap();
        assert_eq!(a[0], 1.5);
    }

    #[test]
    fn shout_discounts_to_payment() {
        let c = ShoutCondition::new(Array::from_slice(&[0.0, 10.0]), 2.0, 0.05);
        let mut a = Array::from_slice(&[1.0, 1.0]);
        c.apply_to(&mut a, 1.0).unwrap();
        assert_eq!(a[0], 1.0);
        assert!((a[1] - 10.0 * (-0.05_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn bermudan_fires_only_near_exercise_times() {
        let american = AmericanCondition::new(Array::from_slice(&[5.0]));
        let c = BermudanCondition::new(american, vec![0.5, 0.25], 1e-6).unwrap();
        assert_eq!(c.exercise_times(), &[0.25, 0.5]);
        let mut a = Array::from_slice(&[1.0]);
        c.apply_to(&mut a, 0.4).unwrap();
        assert_eq!(a[0], 1.0);
        c.apply_to(&mut a, 0.5 + 1e-9).unwrap();
        assert_eq!(a[0], 5.0);
    }

    #[test]
    fn dividend_shift_moves_values_along_the_grid() {
        let dividend = 2.0;
        let new_grid = Array::from_fn(41, |i| (3.0 + 0.05 * i as Real).exp());
        let old_grid = &new_grid + dividend;
        // a value linear in log price is reproduced exactly by the spline
        let mut prices = old_grid.map(|s| 3.0 * s.ln() - 1.0);
        shift_grid_for_dividend(&mut prices, &new_grid, &old_grid).unwrap();
        for (p, s) in prices.iter().zip(new_grid.iter()) {
            assert!((p - (3.0 * s.ln() - 1.0)).abs() < 1e-10);
        }
        assert!(shift_grid_for_dividend(&mut Array::zeros(3), &new_grid, &old_grid).is_err());
    }
}
