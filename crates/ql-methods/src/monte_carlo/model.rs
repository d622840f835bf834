//! Sequential Monte Carlo driver.

use tracing::{instrument, trace};

use ql_core::errors::Result;
use ql_core::{Real, Size};
use ql_math::Statistics;

use super::path_generator::SampleGenerator;
use super::path_pricer::PathPricer;

/// Couples a sample generator with a path pricer and accumulates the
/// weighted prices.
pub struct MonteCarloModel<G, P> {
    generator: G,
    pricer: P,
    statistics: Statistics,
}

impl<G, P> MonteCarloModel<G, P>
where
    G: SampleGenerator,
    P: PathPricer<G::Output>,
{
    /// Model with an empty accumulator.
    pub fn new(generator: G, pricer: P) -> Self {
        Self {
            generator,
            pricer,
            statistics: Statistics::new(),
        }
    }

    /// Draw `samples` more samples into the accumulator.
    #[instrument(level = "trace", skip(self))]
    pub fn add_samples(&mut self, samples: Size) -> Result<()> {
        for _ in 0..samples {
            let sample = self.generator.next();
            let price = self.pricer.value(&sample.value);
            self.statistics.add_weighted(price, sample.weight)?;
        }
        trace!(
            samples = self.statistics.samples(),
            mean = self.statistics.mean().unwrap_or(Real::NAN),
            "samples added"
        );
        Ok(())
    }

    /// Draw `samples` more samples and return the accumulator.
    pub fn sample_accumulator(&mut self, samples: Size) -> Result<&Statistics> {
        self.add_samples(samples)?;
        Ok(&self.statistics)
    }

    /// The accumulator.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Consume the model and return the accumulator.
    pub fn into_statistics(self) -> Statistics {
        self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monte_carlo::path_generator::StandardPathGenerator;
    use crate::monte_carlo::Path;
    use ql_math::Sample;

    struct Counter(f64);

    impl SampleGenerator for Counter {
        type Output = f64;
        fn next(&mut self) -> Sample<f64> {
            self.0 += 1.0;
            Sample::new(self.0, 1.0)
        }
    }

    #[test]
    fn accumulates_across_calls() {
        let mut model = MonteCarloModel::new(Counter(0.0), |x: &f64| *x);
        assert_eq!(model.sample_accumulator(3).unwrap().samples(), 3);
        let stats = model.sample_accumulator(2).unwrap();
        assert_eq!(stats.samples(), 5);
        assert_eq!(stats.mean().unwrap(), 3.0);
    }

    #[test]
    fn terminal_log_return_statistics() {
        let generator = StandardPathGenerator::with_seed(10, 0.001, 0.0004, 17).unwrap();
        let mut model = MonteCarloModel::new(generator, |p: &Path| p.total());
        let stats = model.sample_accumulator(20_000).unwrap();
        assert!((stats.mean().unwrap() - 0.01).abs() < 3.0 * stats.error_estimate().unwrap());
        assert!((stats.variance().unwrap() - 0.004).abs() < 2e-4);
    }
}
