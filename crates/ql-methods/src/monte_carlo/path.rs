//! Sampled paths of log-price increments.

use std::ops::Index;
use std::sync::Arc;

use ql_core::errors::Result;
use ql_core::{ensure_arg, Real, Size};
use ql_math::Array;

use super::time_grid::TimeGrid;

/// One realisation of a process on a time grid.
///
/// Step `i` moves the log price by `drift[i] + diffusion[i]`; the antithetic
/// path uses `drift[i] − diffusion[i]`. Keeping the two parts apart lets a
/// pricer evaluate both paths from a single draw.
#[derive(Debug, Clone)]
pub struct Path {
    time_grid: Arc<TimeGrid>,
    drift: Array,
    diffusion: Array,
}

impl Path {
    /// Path with one drift and one diffusion term per grid step.
    pub fn new(time_grid: Arc<TimeGrid>, drift: Array, diffusion: Array) -> Result<Self> {
        ensure_arg!(
            drift.size() == time_grid.steps() && diffusion.size() == time_grid.steps(),
            "drift ({}) and diffusion ({}) must have one entry per step ({})",
            drift.size(),
            diffusion.size(),
            time_grid.steps()
        );
        Ok(Self {
            time_grid,
            drift,
            diffusion,
        })
    }

    pub(crate) fn from_parts(time_grid: Arc<TimeGrid>, drift: Array, diffusion: Array) -> Self {
        Self {
            time_grid,
            drift,
            diffusion,
        }
    }

    /// Number of steps.
    pub fn len(&self) -> Size {
        self.drift.size()
    }

    /// Return `true` if the path has no steps.
    pub fn is_empty(&self) -> bool {
        self.drift.is_empty()
    }

    /// The grid the path lives on.
    pub fn time_grid(&self) -> &TimeGrid {
        &self.time_grid
    }

    /// Drift terms.
    pub fn drift(&self) -> &Array {
        &self.drift
    }

    /// Diffusion terms.
    pub fn diffusion(&self) -> &Array {
        &self.diffusion
    }

    /// Increment of step `i`.
    pub fn value(&self, i: Size) -> Real {
        self.drift[i] + self.diffusion[i]
    }

    /// Increment of step `i` on the antithetic path.
    pub fn antithetic(&self, i: Size) -> Real {
        self.drift[i] - self.diffusion[i]
    }

    /// Increments in order.
    pub fn values(&self) -> impl Iterator<Item = Real> + '_ {
        self.drift.iter().zip(self.diffusion.iter()).map(|(d, w)| d + w)
    }

    /// Antithetic increments in order.
    pub fn antithetic_values(&self) -> impl Iterator<Item = Real> + '_ {
        self.drift.iter().zip(self.diffusion.iter()).map(|(d, w)| d - w)
    }

    /// Sum of the increments, i.e. the total log return.
    pub fn total(&self) -> Real {
        self.values().sum()
    }

    /// Total log return of the antithetic path.
    pub fn antithetic_total(&self) -> Real {
        self.antithetic_values().sum()
    }
}

/// Correlated paths for several assets on a shared grid.
#[derive(Debug, Clone)]
pub struct MultiPath {
    paths: Vec<Path>,
}

impl MultiPath {
    /// Bundle paths that share the same number of steps.
    pub fn new(paths: Vec<Path>) -> Result<Self> {
        ensure_arg!(!paths.is_empty(), "a multi-path needs at least one asset");
        let len = paths[0].len();
        ensure_arg!(
            paths.iter().all(|p| p.len() == len),
            "all asset paths must have {len} steps"
        );
        Ok(Self { paths })
    }

    pub(crate) fn from_paths(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    /// Number of assets.
    pub fn asset_number(&self) -> Size {
        self.paths.len()
    }

    /// Number of steps of each path.
    pub fn path_size(&self) -> Size {
        self.paths[0].len()
    }

    /// Iterate over the asset paths.
    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }
}

impl Index<Size> for MultiPath {
    type Output = Path;
    fn index(&self, asset: Size) -> &Path {
        &self.paths[asset]
    }
}
