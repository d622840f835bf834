//! Pricer configuration.
//!
//! Every tunable constant of the pricers lives in one of these structs and
//! is passed in at construction; nothing is read from global state.

use tracing::warn;

use ql_core::{BigNatural, Real, Size, Time, Volatility};
use ql_methods::FdScheme;

/// Settings shared by the finite-difference pricers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FdConfig {
    /// Minimum number of grid points.
    pub min_grid_points: Size,
    /// Extra grid points per year of residual time beyond the first.
    pub grid_points_per_year: Size,
    /// Lowest accepted volatility.
    pub min_volatility: Volatility,
    /// Highest accepted volatility.
    pub max_volatility: Volatility,
    /// Half-width of the grid in log standard deviations.
    pub std_devs: Real,
    /// Widens the grid when `σ√T` is small: the half-width is scaled by
    /// `1 + small_vol_prefactor / (σ√T)`.
    pub small_vol_prefactor: Real,
    /// The strike is kept inside `[K / f, K · f]` of the grid.
    pub safety_zone_factor: Real,
    /// Time-stepping scheme.
    pub scheme: FdScheme,
}

impl Default for FdConfig {
    fn default() -> Self {
        Self {
            min_grid_points: 100,
            grid_points_per_year: 50,
            min_volatility: 0.0005,
            max_volatility: 3.0,
            std_devs: 4.0,
            small_vol_prefactor: 0.02,
            safety_zone_factor: 1.1,
            scheme: FdScheme::CrankNicolson,
        }
    }
}

impl FdConfig {
    /// Set [`min_grid_points`](Self::min_grid_points).
    pub fn with_min_grid_points(mut self, points: Size) -> Self {
        self.min_grid_points = points;
        self
    }

    /// Set [`grid_points_per_year`](Self::grid_points_per_year).
    pub fn with_grid_points_per_year(mut self, points: Size) -> Self {
        self.grid_points_per_year = points;
        self
    }

    /// Set the accepted volatility range.
    pub fn with_volatility_bounds(mut self, min: Volatility, max: Volatility) -> Self {
        self.min_volatility = min;
        self.max_volatility = max;
        self
    }

    /// Set [`std_devs`](Self::std_devs).
    pub fn with_std_devs(mut self, std_devs: Real) -> Self {
        self.std_devs = std_devs;
        self
    }

    /// Set [`small_vol_prefactor`](Self::small_vol_prefactor).
    pub fn with_small_vol_prefactor(mut self, prefactor: Real) -> Self {
        self.small_vol_prefactor = prefactor;
        self
    }

    /// Set [`safety_zone_factor`](Self::safety_zone_factor).
    pub fn with_safety_zone_factor(mut self, factor: Real) -> Self {
        self.safety_zone_factor = factor;
        self
    }

    /// Set [`scheme`](Self::scheme).
    pub fn with_scheme(mut self, scheme: FdScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Grid size actually used for `requested` points at residual time `t`.
    ///
    /// At least `min_grid_points`, plus `grid_points_per_year` for every
    /// year beyond the first; the result is made odd so that the
    /// underlying sits on a grid node.
    pub fn safe_grid_points(&self, requested: Size, t: Time) -> Size {
        let extra_years = (t - 1.0).max(0.0);
        let floor = self.min_grid_points + (extra_years * self.grid_points_per_year as Real) as Size;
        let mut points = requested.max(floor).max(3);
        if points % 2 == 0 {
            points += 1;
        }
        if points != requested {
            warn!(requested, used = points, residual_time = t, "grid points adjusted");
        }
        points
    }
}

/// Settings shared by the Monte Carlo pricers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct McConfig {
    /// Samples drawn before any convergence check.
    pub min_samples: Size,
    /// Price each draw on the path and its antithetic mirror.
    pub antithetic_variate: bool,
    /// Generator seed; `0` draws one from the operating system.
    pub seed: BigNatural,
}

impl Default for McConfig {
    fn default() -> Self {
        Self {
            min_samples: 100,
            antithetic_variate: false,
            seed: 0,
        }
    }
}

impl McConfig {
    /// Set [`min_samples`](Self::min_samples).
    pub fn with_min_samples(mut self, samples: Size) -> Self {
        self.min_samples = samples;
        self
    }

    /// Set [`antithetic_variate`](Self::antithetic_variate).
    pub fn with_antithetic_variate(mut self, antithetic: bool) -> Self {
        self.antithetic_variate = antithetic;
        self
    }

    /// Set [`seed`](Self::seed).
    pub fn with_seed(mut self, seed: BigNatural) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_grid_points_rule() {
        let c = FdConfig::default();
        assert_eq!(c.safe_grid_points(50, 0.5), 101);
        assert_eq!(c.safe_grid_points(50, 3.0), 201);
        assert_eq!(c.safe_grid_points(301, 3.0), 301);
        assert_eq!(c.safe_grid_points(400, 1.0), 401);
        let coarse = FdConfig::default().with_min_grid_points(10).with_grid_points_per_year(0);
        assert_eq!(coarse.safe_grid_points(11, 5.0), 11);
    }

    #[test]
    fn builders() {
        let c = McConfig::default().with_seed(7).with_antithetic_variate(true);
        assert_eq!((c.seed, c.antithetic_variate, c.min_samples), (7, true, 100));
        let f = FdConfig::default().with_scheme(FdScheme::BackwardEuler);
        assert_eq!(f.scheme, FdScheme::BackwardEuler);
    }
}
