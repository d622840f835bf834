//! Generators of single-asset sample paths.

use std::sync::Arc;

use ql_core::errors::Result;
use ql_core::{ensure_arg, BigNatural, Real, Size};
use ql_math::random_numbers::{GaussianRandomGenerator, SeedableGenerator};
use ql_math::{Array, RandomNumberGenerator, Sample};

use super::path::Path;
use super::time_grid::TimeGrid;

/// Source of weighted samples for a [`MonteCarloModel`](super::MonteCarloModel).
pub trait SampleGenerator {
    /// What one draw yields, e.g. a [`Path`].
    type Output;

    /// Draw the next sample.
    fn next(&mut self) -> Sample<Self::Output>;
}

impl<S: SampleGenerator + ?Sized> SampleGenerator for Box<S> {
    type Output = S::Output;
    fn next(&mut self) -> Sample<S::Output> {
        (**self).next()
    }
}

/// Paths of a Brownian motion with drift, in log space.
///
/// Step `i` of length `dt_i` has drift `μ·dt_i` and diffusion
/// `sqrt(σ²·dt_i)·z_i` with `z_i` drawn from the Gaussian generator `G`.
/// The path weight is the product of the deviate weights.
#[derive(Debug, Clone)]
pub struct PathGenerator<G> {
    generator: G,
    time_grid: Arc<TimeGrid>,
    drift: Array,
    std_dev: Array,
}

/// Path generator on the default Gaussian generator.
pub type StandardPathGenerator = PathGenerator<GaussianRandomGenerator>;

impl<G: RandomNumberGenerator> PathGenerator<G> {
    /// Paths with annual `drift` and `variance` on `time_grid`.
    pub fn new(drift: Real, variance: Real, time_grid: TimeGrid, generator: G) -> Result<Self> {
        ensure_arg!(variance >= 0.0, "negative variance ({variance})");
        ensure_arg!(time_grid.steps() > 0, "time grid has no steps");
        let drift_per_step = time_grid.dts().iter().map(|dt| drift * dt).collect();
        let std_dev = time_grid.dts().iter().map(|dt| (variance * dt).sqrt()).collect();
        Ok(Self {
            generator,
            time_grid: Arc::new(time_grid),
            drift: drift_per_step,
            std_dev,
        })
    }

    /// Paths of `steps` unit steps, each `mu + sqrt(variance)·z`.
    pub fn with_step_parameters(steps: Size, mu: Real, variance: Real, generator: G) -> Result<Self> {
        Self::new(mu, variance, TimeGrid::uniform(steps as Real, steps)?, generator)
    }

    /// The grid paths are drawn on.
    pub fn time_grid(&self) -> &TimeGrid {
        &self.time_grid
    }

    /// Number of steps per path.
    pub fn size(&self) -> Size {
        self.drift.size()
    }
}

impl<G: RandomNumberGenerator + SeedableGenerator> PathGenerator<G> {
    /// [`with_step_parameters`](Self::with_step_parameters) on a generator
    /// built from `seed`.
    pub fn with_seed(steps: Size, mu: Real, variance: Real, seed: BigNatural) -> Result<Self> {
        Self::with_step_parameters(steps, mu, variance, G::with_seed(seed))
    }
}

impl<G: RandomNumberGenerator> SampleGenerator for PathGenerator<G> {
    type Output = Path;

    fn next(&mut self) -> Sample<Path> {
        let mut weight: Real = 1.0;
        let diffusion: Array = self
            .std_dev
            .iter()
            .map(|s| {
                let z = self.generator.next();
                weight *= z.weight;
                s * z.value
            })
            .collect();
        let path = Path::from_parts(self.time_grid.clone(), self.drift.clone(), diffusion);
        Sample::new(path, weight)
    }
}
