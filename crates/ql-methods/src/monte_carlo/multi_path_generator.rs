//! Generator of correlated multi-asset paths.

use std::sync::Arc;

use ql_core::errors::Result;
use ql_core::{ensure_arg, Real};
use ql_math::random_numbers::RandomArrayGenerator;
use ql_math::{Array, Matrix, RandomNumberGenerator, Sample};

use super::path::{MultiPath, Path};
use super::path_generator::SampleGenerator;
use super::time_grid::TimeGrid;

/// Correlated Brownian paths for several assets.
///
/// At each step an independent Gaussian vector `z` is drawn; asset `j`
/// receives diffusion `sqrt(dt)·(S·z)_j` and drift `μ_j·dt`, where `S` is
/// the pseudo square root of the annual covariance.
#[derive(Debug, Clone)]
pub struct MultiPathGenerator<G> {
    generator: RandomArrayGenerator<G>,
    drifts: Array,
    time_grid: Arc<TimeGrid>,
}

impl<G: RandomNumberGenerator> MultiPathGenerator<G> {
    /// Generator for assets with annual `drifts` and `covariance`.
    pub fn new(drifts: Array, covariance: &Matrix, time_grid: TimeGrid, generator: G) -> Result<Self> {
        ensure_arg!(!drifts.is_empty(), "no assets given");
        ensure_arg!(
            covariance.rows() == drifts.size() && covariance.cols() == drifts.size(),
            "covariance matrix is {}x{} but {} drifts were given",
            covariance.rows(),
            covariance.cols(),
            drifts.size()
        );
        ensure_arg!(time_grid.steps() > 0, "time grid has no steps");
        Ok(Self {
            generator: RandomArrayGenerator::new(covariance, generator)?,
            drifts,
            time_grid: Arc::new(time_grid),
        })
    }

    /// Number of assets.
    pub fn asset_number(&self) -> usize {
        self.drifts.size()
    }

    /// The grid paths are drawn on.
    pub fn time_grid(&self) -> &TimeGrid {
        &self.time_grid
    }
}

impl<G: RandomNumberGenerator> SampleGenerator for MultiPathGenerator<G> {
    type Output = MultiPath;

    fn next(&mut self) -> Sample<MultiPath> {
        let assets = self.drifts.size();
        let steps = self.time_grid.steps();
        let mut drift = vec![Array::zeros(steps); assets];
        let mut diffusion = vec![Array::zeros(steps); assets];
        let mut weight: Real = 1.0;
        for (i, &dt) in self.time_grid.dts().iter().enumerate() {
            let z = self.generator.next();
            weight *= z.weight;
            let scale = dt.sqrt();
            for j in 0..assets {
                drift[j][i] = self.drifts[j] * dt;
                diffusion[j][i] = scale * z.value[j];
            }
        }
        let paths = drift
            .into_iter()
            .zip(diffusion)
            .map(|(d, w)| Path::from_parts(self.time_grid.clone(), d, w))
            .collect();
        Sample::new(MultiPath::from_paths(paths), weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_math::random_numbers::SeedableGenerator;
    use ql_math::{GaussianRandomGenerator, Statistics};

    #[test]
    fn terminal_covariance_matches_input() {
        let cov = Matrix::from_row_slice(2, 2, &[0.04, 0.018, 0.018, 0.09]);
        let grid = TimeGrid::uniform(2.0, 4).unwrap();
        let drifts = Array::from_slice(&[0.01, -0.02]);
        let mut g =
            MultiPathGenerator::new(drifts, &cov, grid, GaussianRandomGenerator::with_seed(3))
                .unwrap();
        let (mut x, mut y, mut xy) = (Statistics::new(), Statistics::new(), Statistics::new());
        for _ in 0..40_000 {
            let mp = g.next().value;
            assert_eq!(mp.asset_number(), 2);
            let (a, b) = (mp[0].total(), mp[1].total());
            x.add(a);
            y.add(b);
            xy.add((a - 0.02) * (b + 0.04));
        }
        assert!((x.mean().unwrap() - 0.02).abs() < 0.01);
        assert!((x.variance().unwrap() - 0.08).abs() < 0.005);
        assert!((y.variance().unwrap() - 0.18).abs() < 0.01);
        assert!((xy.mean().unwrap() - 0.036).abs() < 0.005);
    }

    #[test]
    fn shapes_are_checked() {
        let cov = Matrix::identity(3);
        let grid = TimeGrid::uniform(1.0, 1).unwrap();
        let g = GaussianRandomGenerator::with_seed(1);
        assert!(MultiPathGenerator::new(Array::zeros(2), &cov, grid, g).is_err());
    }
}
