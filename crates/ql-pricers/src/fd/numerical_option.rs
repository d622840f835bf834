//! Grid machinery shared by the finite-difference pricers.

use ql_core::errors::Result;
use ql_core::{ensure, ensure_arg, Real, Size, Time};
use ql_math::Array;
use ql_methods::finite_differences::{
    first_derivative_at_center, second_derivative_at_center, value_at_center, BoundaryCondition,
    BsmOperator, FiniteDifferenceModel, StepCondition,
};
use ql_methods::TridiagonalOperator;

use crate::config::FdConfig;
use crate::parameters::BsmParameters;
use crate::results::OptionResults;

/// Log-uniform price grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FdGrid {
    /// Grid prices, increasing, with `center` at the middle node.
    pub prices: Array,
    /// Spacing in log price.
    pub log_spacing: Real,
    /// Price the grid was centred on.
    pub center: Real,
}

impl FdGrid {
    /// `points` prices from `s_min` to `s_max`, equally spaced in log price.
    pub fn log_uniform(center: Real, s_min: Real, s_max: Real, points: Size) -> Result<Self> {
        ensure_arg!(points >= 3, "a grid needs at least 3 points, got {points}");
        ensure_arg!(
            s_min > 0.0 && s_max > s_min,
            "invalid grid limits [{s_min}, {s_max}]"
        );
        let log_spacing = (s_max.ln() - s_min.ln()) / (points - 1) as Real;
        let edx = log_spacing.exp();
        let mut prices = Array::try_zeros(points)?;
        prices[0] = s_min;
        for j in 1..points {
            prices[j] = prices[j - 1] * edx;
        }
        Ok(Self {
            prices,
            log_spacing,
            center,
        })
    }

    /// Lowest grid price.
    pub fn s_min(&self) -> Real {
        self.prices[0]
    }

    /// Highest grid price.
    pub fn s_max(&self) -> Real {
        self.prices[self.prices.size() - 1]
    }

    /// Number of points.
    pub fn size(&self) -> Size {
        self.prices.size()
    }
}

/// Validated inputs plus the grid construction rules of the Black-Scholes
/// finite-difference pricers.
#[derive(Debug, Clone)]
pub struct BsmNumericalOption {
    params: BsmParameters,
    grid_points: Size,
    config: FdConfig,
}

impl BsmNumericalOption {
    /// Validate `params` and fix the grid size from `grid_points` and the
    /// configured safe-grid-points rule.
    pub fn new(params: BsmParameters, grid_points: Size, config: FdConfig) -> Result<Self> {
        params.validate()?;
        ensure_arg!(
            params.volatility >= config.min_volatility && params.volatility <= config.max_volatility,
            "volatility ({}) outside [{}, {}]",
            params.volatility,
            config.min_volatility,
            config.max_volatility
        );
        ensure_arg!(
            config.std_devs > 0.0 && config.safety_zone_factor >= 1.0,
            "grid width settings must be positive"
        );
        let grid_points = config.safe_grid_points(grid_points, params.residual_time);
        Ok(Self {
            params,
            grid_points,
            config,
        })
    }

    /// The inputs.
    pub fn parameters(&self) -> &BsmParameters {
        &self.params
    }

    /// Grid size in use (always odd).
    pub fn grid_points(&self) -> Size {
        self.grid_points
    }

    /// The configuration.
    pub fn config(&self) -> &FdConfig {
        &self.config
    }

    /// Grid limits `(s_min, s_max)` for a grid centred on `center` that must
    /// cover a diffusion over `t` years.
    ///
    /// The limits are symmetric around `center` in log price and always
    /// contain `[K / f, K · f]` for the safety zone factor `f`.
    pub fn grid_limits(&self, center: Real, t: Time) -> Result<(Real, Real)> {
        ensure_arg!(center > 0.0, "grid center ({center}) must be positive");
        ensure_arg!(t > 0.0, "grid time ({t}) must be positive");
        let vol_sqrt_time = self.params.volatility * t.sqrt();
        let prefactor = 1.0 + self.config.small_vol_prefactor / vol_sqrt_time;
        let factor = (self.config.std_devs * prefactor * vol_sqrt_time).exp();
        let mut s_min = center / factor;
        let mut s_max = center * factor;
        let strike = self.params.strike;
        let safety = self.config.safety_zone_factor;
        if s_min > strike / safety {
            s_min = strike / safety;
            s_max = center / (s_min / center);
        }
        if s_max < strike * safety {
            s_max = strike * safety;
            s_min = center / (s_max / center);
        }
        Ok((s_min, s_max))
    }

    /// Log-uniform grid of [`grid_points`](Self::grid_points) between the
    /// given limits.
    pub fn grid(&self, center: Real, s_min: Real, s_max: Real) -> Result<FdGrid> {
        FdGrid::log_uniform(center, s_min, s_max, self.grid_points)
    }

    /// Payoff evaluated on the grid.
    pub fn intrinsic_values(&self, grid: &FdGrid) -> Array {
        let payoff = self.params.payoff();
        grid.prices.map(|s| payoff.value(s))
    }

    /// Log-space Black-Scholes operator on `grid`, with Neumann conditions
    /// matching the slope of the intrinsic values at both edges.
    pub fn operator(&self, grid: &FdGrid, intrinsic: &Array) -> Result<TridiagonalOperator> {
        let n = grid.size();
        ensure_arg!(intrinsic.size() == n, "intrinsic values do not match the grid");
        let mut op = BsmOperator::log_space(
            n,
            grid.log_spacing,
            self.params.risk_free_rate,
            self.params.dividend_yield,
            self.params.volatility,
        )?;
        op.set_lower_bc(BoundaryCondition::Neumann(intrinsic[1] - intrinsic[0]));
        op.set_upper_bc(BoundaryCondition::Neumann(intrinsic[n - 1] - intrinsic[n - 2]));
        Ok(op)
    }

    /// Rollback model for `grid` under the configured scheme.
    pub fn model(&self, grid: &FdGrid, intrinsic: &Array) -> Result<FiniteDifferenceModel> {
        Ok(FiniteDifferenceModel::from_operator(
            self.operator(grid, intrinsic)?,
            self.config.scheme,
        ))
    }
}

/// Value and Greeks from the prices at time 0 and the centre value one
/// step `dt` later.
pub(crate) fn grid_results(
    prices: &Array,
    grid: &FdGrid,
    value_at_dt: Real,
    dt: Time,
) -> Result<OptionResults> {
    let value = value_at_center(prices)?;
    let results = OptionResults {
        value,
        delta: first_derivative_at_center(prices, &grid.prices)?,
        gamma: second_derivative_at_center(prices, &grid.prices)?,
        theta: (value_at_dt - value) / dt,
    };
    ensure!(
        results.value.is_finite() && results.delta.is_finite() && results.gamma.is_finite(),
        "non-finite results {results:?}"
    );
    Ok(results)
}

/// Roll `prices` from `from` to `dt`, record the centre value, then take
/// the last step to 0.
pub(crate) fn rollback_to_today(
    model: &mut FiniteDifferenceModel,
    prices: &mut Array,
    from: Time,
    dt: Time,
    steps: Size,
    condition: &dyn StepCondition,
) -> Result<Real> {
    model.rollback(prices, from, dt, steps, Some(condition))?;
    let value_at_dt = value_at_center(prices)?;
    model.rollback(prices, dt, 0.0, 1, Some(condition))?;
    Ok(value_at_dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::OptionType;

    fn params(strike: Real) -> BsmParameters {
        BsmParameters::new(OptionType::Call, 100.0, strike, 0.0, 0.05, 1.0, 0.2)
    }

    #[test]
    fn validation() {
        let c = FdConfig::default();
        assert!(BsmNumericalOption::new(params(100.0), 101, c.clone()).is_ok());
        let mut p = params(100.0);
        p.volatility = 5.0;
        assert!(BsmNumericalOption::new(p, 101, c.clone()).is_err());
        p = params(-1.0);
        assert!(BsmNumericalOption::new(p, 101, c.clone()).is_err());
        p = params(100.0);
        p.residual_time = 0.0;
        assert!(BsmNumericalOption::new(p, 101, c).is_err());
    }

    #[test]
    fn limits_are_symmetric_and_contain_the_strike() {
        let opt = BsmNumericalOption::new(params(100.0), 101, FdConfig::default()).unwrap();
        let (lo, hi) = opt.grid_limits(100.0, 1.0).unwrap();
        let factor = (4.0 * (1.0 + 0.02 / 0.2) * 0.2_f64).exp();
        assert!((hi - 100.0 * factor).abs() < 1e-9);
        assert!((lo * hi - 100.0 * 100.0).abs() < 1e-8);

        // far strike forces the grid to widen
        let far = BsmNumericalOption::new(params(400.0), 101, FdConfig::default()).unwrap();
        let (lo, hi) = far.grid_limits(100.0, 0.1).unwrap();
        assert!((hi - 440.0).abs() < 1e-9);
        assert!((lo * hi - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn grid_is_centred() {
        let opt = BsmNumericalOption::new(params(100.0), 50, FdConfig::default()).unwrap();
        assert_eq!(opt.grid_points(), 101);
        let (lo, hi) = opt.grid_limits(100.0, 1.0).unwrap();
        let grid = opt.grid(100.0, lo, hi).unwrap();
        assert!((grid.prices[50] - 100.0).abs() < 1e-9);
        assert!((grid.s_max() - hi).abs() < 1e-9);
        let op = opt.operator(&grid, &opt.intrinsic_values(&grid)).unwrap();
        assert_eq!(op.lower_bc(), BoundaryCondition::Neumann(0.0));
    }
}
