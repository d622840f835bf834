use ql_core::{BigNatural, Real};

use super::{RandomNumberGenerator, Sample, SeedableGenerator};
use crate::distributions::normal::inverse_on_open_unit_interval;

/// Standard normal deviates by the polar Box-Muller method.
///
/// Pairs of uniforms mapped to `(-1, 1)²` are rejected until they fall
/// strictly inside the unit disc; each accepted pair yields two independent
/// deviates. The second one is cached and returned by the following call,
/// with the same weight (the product of the two uniform weights).
#[derive(Debug, Clone)]
pub struct BoxMuller<U> {
    uniform: U,
    cached: Option<Sample<Real>>,
}

impl<U: RandomNumberGenerator> BoxMuller<U> {
    /// Wrap a uniform generator.
    pub fn new(uniform: U) -> Self {
        Self {
            uniform,
            cached: None,
        }
    }
}

impl<U: RandomNumberGenerator + SeedableGenerator> SeedableGenerator for BoxMuller<U> {
    fn with_seed(seed: BigNatural) -> Self {
        Self::new(U::with_seed(seed))
    }
}

impl<U: RandomNumberGenerator> RandomNumberGenerator for BoxMuller<U> {
    fn next(&mut self) -> Sample<Real> {
        if let Some(s) = self.cached.take() {
            return s;
        }
        loop {
            let s1 = self.uniform.next();
            let s2 = self.uniform.next();
            let x1 = 2.0 * s1.value - 1.0;
            let x2 = 2.0 * s2.value - 1.0;
            let r = x1 * x1 + x2 * x2;
            if r >= 1.0 || r <= 0.0 {
                continue;
            }
            let ratio = (-2.0 * r.ln() / r).sqrt();
            let weight = s1.weight * s2.weight;
            self.cached = Some(Sample::new(x2 * ratio, weight));
            return Sample::new(x1 * ratio, weight);
        }
    }
}

/// Standard normal deviates through the inverse cumulative normal.
#[derive(Debug, Clone)]
pub struct InverseCumulativeGaussian<U> {
    uniform: U,
}

impl<U: RandomNumberGenerator> InverseCumulativeGaussian<U> {
    /// Wrap a uniform generator.
    pub fn new(uniform: U) -> Self {
        Self { uniform }
    }
}

impl<U: RandomNumberGenerator + SeedableGenerator> SeedableGenerator
    for InverseCumulativeGaussian<U>
{
    fn with_seed(seed: BigNatural) -> Self {
        Self::new(U::with_seed(seed))
    }
}

impl<U: RandomNumberGenerator> RandomNumberGenerator for InverseCumulativeGaussian<U> {
    fn next(&mut self) -> Sample<Real> {
        let u = self.uniform.next();
        Sample::new(inverse_on_open_unit_interval(u.value), u.weight)
    }
}

/// Approximately normal deviates as the sum of twelve uniforms minus six.
#[derive(Debug, Clone)]
pub struct CentralLimitGaussian<U> {
    uniform: U,
}

impl<U: RandomNumberGenerator> CentralLimitGaussian<U> {
    /// Wrap a uniform generator.
    pub fn new(uniform: U) -> Self {
        Self { uniform }
    }
}

impl<U: RandomNumberGenerator + SeedableGenerator> SeedableGenerator for CentralLimitGaussian<U> {
    fn with_seed(seed: BigNatural) -> Self {
        Self::new(U::with_seed(seed))
    }
}

impl<U: RandomNumberGenerator> RandomNumberGenerator for CentralLimitGaussian<U> {
    fn next(&mut self) -> Sample<Real> {
        let mut value = -6.0;
        let mut weight = 1.0;
        for _ in 0..12 {
            let u = self.uniform.next();
            value += u.value;
            weight *= u.weight;
        }
        Sample::new(value, weight)
    }
}
