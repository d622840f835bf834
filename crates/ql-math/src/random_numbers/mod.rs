//! Random number generators.
//!
//! Every generator yields [`Sample`]s: a value together with the weight the
//! Monte Carlo machinery carries along. Uniform generators produce values in
//! the open interval `(0, 1)` with unit weight; Gaussian generators are built
//! on top of any uniform generator and propagate its weights.

mod gaussian;
mod random_array;
mod uniform;

pub use gaussian::{BoxMuller, CentralLimitGaussian, InverseCumulativeGaussian};
pub use random_array::RandomArrayGenerator;
pub use uniform::{MersenneTwisterUniformRng, MinimalStandardRng};

use ql_core::{BigNatural, Real};

/// A drawn value and the weight attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<T> {
    /// The drawn value.
    pub value: T,
    /// Its statistical weight.
    pub weight: Real,
}

impl<T> Sample<T> {
    /// Pair a value with a weight.
    pub fn new(value: T, weight: Real) -> Self {
        Self { value, weight }
    }
}

/// A source of scalar random deviates.
pub trait RandomNumberGenerator: Send {
    /// The next deviate with its weight.
    fn next(&mut self) -> Sample<Real>;

    /// The next deviate, discarding the weight.
    fn next_real(&mut self) -> Real {
        self.next().value
    }
}

/// Generators that can be rebuilt deterministically from a seed.
///
/// A seed of `0` asks for a seed drawn from the operating system, so two
/// generators built that way are not reproducible.
pub trait SeedableGenerator: Sized {
    /// Build the generator from `seed`.
    fn with_seed(seed: BigNatural) -> Self;
}

/// The default uniform generator.
pub type UniformRandomGenerator = MinimalStandardRng;

/// The default Gaussian generator: polar Box-Muller over the default
/// uniform generator.
pub type GaussianRandomGenerator = BoxMuller<UniformRandomGenerator>;

pub(crate) fn os_seed() -> BigNatural {
    use rand::RngCore;
    loop {
        let s = rand::rngs::OsRng.next_u64();
        if s != 0 {
            return s;
        }
    }
}
