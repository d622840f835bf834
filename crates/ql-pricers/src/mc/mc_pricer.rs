//! Convergence driver over a Monte Carlo model.

use tracing::{debug, instrument};

use ql_core::errors::Result;
use ql_core::{ensure, ensure_arg, fail, Real, Size};
use ql_math::Statistics;
use ql_methods::{MonteCarloModel, PathPricer, SampleGenerator};

use crate::results::McResults;

/// Draws samples until a requested accuracy or sample count is reached.
pub struct McPricer<G, P> {
    model: MonteCarloModel<G, P>,
    min_samples: Size,
}

impl<G, P> McPricer<G, P>
where
    G: SampleGenerator,
    P: PathPricer<G::Output>,
{
    /// Pricer drawing at least `min_samples` samples before any estimate.
    pub fn new(generator: G, pricer: P, min_samples: Size) -> Result<Self> {
        ensure_arg!(min_samples > 0, "the minimum number of samples must be positive");
        Ok(Self {
            model: MonteCarloModel::new(generator, pricer),
            min_samples,
        })
    }

    /// Minimum number of samples.
    pub fn min_samples(&self) -> Size {
        self.min_samples
    }

    /// Estimate with relative error `error_estimate / |mean|` at most
    /// `tolerance`, drawing no more than `max_samples` samples in total.
    #[instrument(level = "debug", skip(self))]
    pub fn value(&mut self, tolerance: Real, max_samples: Size) -> Result<Real> {
        ensure_arg!(tolerance > 0.0, "tolerance ({tolerance}) must be positive");
        let mut samples = self.model.statistics().samples();
        if samples < self.min_samples {
            self.model.add_samples(self.min_samples - samples)?;
            samples = self.min_samples;
        }

        let mut mean = self.model.statistics().mean()?;
        let mut accuracy = self.model.statistics().error_estimate()? / mean.abs();
        while accuracy > tolerance {
            let order = accuracy * accuracy / (tolerance * tolerance);
            let wanted = (samples as Real * order * 0.8 - samples as Real).max(self.min_samples as Real);
            let next_batch = (wanted as Size).min(max_samples.saturating_sub(samples));
            if next_batch == 0 {
                fail!(
                    "max number of samples ({max_samples}) reached with accuracy {accuracy} above {tolerance}"
                );
            }
            samples += next_batch;
            self.model.add_samples(next_batch)?;
            mean = self.model.statistics().mean()?;
            accuracy = self.model.statistics().error_estimate()? / mean.abs();
            debug!(samples, mean, accuracy, "batch added");
        }
        Ok(mean)
    }

    /// Estimate from exactly `samples` samples in total.
    pub fn value_with_samples(&mut self, samples: Size) -> Result<Real> {
        ensure!(
            samples >= self.min_samples,
            "{samples} samples requested, at least {} required",
            self.min_samples
        );
        let drawn = self.model.statistics().samples();
        ensure!(
            samples >= drawn,
            "{samples} samples requested but {drawn} already drawn"
        );
        self.model.add_samples(samples - drawn)?;
        self.model.statistics().mean()
    }

    /// Standard error of the current estimate.
    pub fn error_estimate(&self) -> Result<Real> {
        self.model.statistics().error_estimate()
    }

    /// The current estimate.
    pub fn results(&self) -> Result<McResults> {
        let stats = self.model.statistics();
        Ok(McResults {
            value: stats.mean()?,
            error_estimate: stats.error_estimate()?,
            samples: stats.samples(),
        })
    }

    /// The accumulated samples.
    pub fn statistics(&self) -> &Statistics {
        self.model.statistics()
    }
}
