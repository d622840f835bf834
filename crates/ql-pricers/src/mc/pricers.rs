//! Ready-made Monte Carlo pricers under Black-Scholes dynamics.
//!
//! Each pricer derefs to its [`McPricer`], which draws the samples.

use std::ops::{Deref, DerefMut};

use ql_core::errors::Result;
use ql_core::{ensure_arg, BigNatural, DiscountFactor, Rate, Real, Size, Time};
use ql_math::{Array, GaussianRandomGenerator, Matrix, SeedableGenerator};
use ql_methods::monte_carlo::ControlVariatedPathPricer;
use ql_methods::{MultiPathGenerator, Path, PathGenerator, PathPricer, StandardPathGenerator, TimeGrid};

use super::mc_pricer::McPricer;
use super::multi_path_pricers::{
    BasketPathPricer, BasketType, EverestPathPricer, HimalayaPathPricer, PagodaPathPricer,
};
use super::path_pricers::{
    ArithmeticApoPathPricer, ArithmeticAsoPathPricer, BarrierPathPricer, BarrierType,
    EuropeanPathPricer, GeometricApoPathPricer,
};
use crate::config::McConfig;
use crate::parameters::BsmParameters;
use crate::payoff::OptionType;

/// Multi-asset generator on the default Gaussian generator.
pub type StandardMultiPathGenerator = MultiPathGenerator<GaussianRandomGenerator>;

macro_rules! mc_pricer_wrapper {
    ($(#[$meta:meta])* $name:ident, $generator:ty, $pricer:ty) => {
        $(#[$meta])*
        pub struct $name {
            pricer: McPricer<$generator, $pricer>,
        }

        impl Deref for $name {
            type Target = McPricer<$generator, $pricer>;

            fn deref(&self) -> &Self::Target {
                &self.pricer
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.pricer
            }
        }
    };
}

fn single_asset_generator(params: &BsmParameters, grid: TimeGrid, seed: BigNatural) -> Result<StandardPathGenerator> {
    params.validate()?;
    PathGenerator::new(
        params.log_drift(),
        params.volatility * params.volatility,
        grid,
        GaussianRandomGenerator::with_seed(seed),
    )
}

fn check_fixing_times(times: &[Time], expiry: Time) -> Result<()> {
    ensure_arg!(!times.is_empty(), "no fixing times given");
    ensure_arg!(
        times.windows(2).all(|w| w[0] < w[1]),
        "fixing times must be strictly increasing: {times:?}"
    );
    ensure_arg!(
        times[0] > 0.0 && times[times.len() - 1] <= expiry,
        "fixing times must lie in (0, {expiry}]: {times:?}"
    );
    Ok(())
}

mc_pricer_wrapper!(
    /// European option.
    McEuropean,
    StandardPathGenerator,
    EuropeanPathPricer
);

impl McEuropean {
    /// One-step simulation of `S_T`.
    pub fn new(params: &BsmParameters, config: &McConfig) -> Result<Self> {
        let generator =
            single_asset_generator(params, TimeGrid::uniform(params.residual_time, 1)?, config.seed)?;
        let pricer = EuropeanPathPricer::new(
            params.option_type,
            params.underlying,
            params.strike,
            params.discount(),
            config.antithetic_variate,
        )?;
        Ok(Self {
            pricer: McPricer::new(generator, pricer, config.min_samples)?,
        })
    }
}

/// Path pricer of [`McDiscreteArithmeticApo`], with or without the
/// geometric control variate.
pub enum ApoPathPricer {
    /// Arithmetic payoff only.
    Plain(ArithmeticApoPathPricer),
    /// Arithmetic payoff minus geometric payoff plus its exact value.
    ControlVariated(
        ControlVariatedPathPricer<Path, ArithmeticApoPathPricer, GeometricApoPathPricer>,
    ),
}

impl PathPricer<Path> for ApoPathPricer {
    fn value(&self, path: &Path) -> Real {
        match self {
            ApoPathPricer::Plain(p) => p.value(path),
            ApoPathPricer::ControlVariated(p) => p.value(path),
        }
    }
}

mc_pricer_wrapper!(
    /// Discrete arithmetic average-price option, optionally controlled by
    /// its geometric counterpart.
    McDiscreteArithmeticApo,
    StandardPathGenerator,
    ApoPathPricer
);

impl McDiscreteArithmeticApo {
    /// Option fixing at `fixing_times`, paid at the residual time.
    ///
    /// With `control_variate_value`, the exact price of the geometric
    /// average-price option on the same fixings (see
    /// [`discrete_geometric_apo_value`](super::discrete_geometric_apo_value)),
    /// each sample is corrected by the geometric payoff.
    pub fn new(
        params: &BsmParameters,
        fixing_times: &[Time],
        control_variate_value: Option<Real>,
        config: &McConfig,
    ) -> Result<Self> {
        check_fixing_times(fixing_times, params.residual_time)?;
        let generator =
            single_asset_generator(params, TimeGrid::from_times(fixing_times, 0)?, config.seed)?;
        let arithmetic = ArithmeticApoPathPricer::new(
            params.option_type,
            params.underlying,
            params.strike,
            params.discount(),
            config.antithetic_variate,
        )?;
        let pricer = match control_variate_value {
            Some(value) => {
                let geometric = GeometricApoPathPricer::new(
                    params.option_type,
                    params.underlying,
                    params.strike,
                    params.discount(),
                    config.antithetic_variate,
                )?;
                ApoPathPricer::ControlVariated(ControlVariatedPathPricer::new(
                    arithmetic, geometric, value,
                ))
            }
            None => ApoPathPricer::Plain(arithmetic),
        };
        Ok(Self {
            pricer: McPricer::new(generator, pricer, config.min_samples)?,
        })
    }
}

mc_pricer_wrapper!(
    /// Discrete arithmetic average-strike option.
    McDiscreteArithmeticAso,
    StandardPathGenerator,
    ArithmeticAsoPathPricer
);

impl McDiscreteArithmeticAso {
    /// Option fixing at `fixing_times`; the strike of `params` is ignored.
    pub fn new(params: &BsmParameters, fixing_times: &[Time], config: &McConfig) -> Result<Self> {
        check_fixing_times(fixing_times, params.residual_time)?;
        let generator =
            single_asset_generator(params, TimeGrid::from_times(fixing_times, 0)?, config.seed)?;
        let pricer = ArithmeticAsoPathPricer::new(
            params.option_type,
            params.underlying,
            0.0,
            params.discount(),
            config.antithetic_variate,
        )?;
        Ok(Self {
            pricer: McPricer::new(generator, pricer, config.min_samples)?,
        })
    }
}

mc_pricer_wrapper!(
    /// Barrier option monitored at equally spaced dates.
    McBarrier,
    StandardPathGenerator,
    BarrierPathPricer
);

impl McBarrier {
    /// Option monitored at `monitoring_steps` equally spaced times up to
    /// expiry.
    pub fn new(
        params: &BsmParameters,
        barrier_type: BarrierType,
        barrier: Real,
        rebate: Real,
        monitoring_steps: Size,
        config: &McConfig,
    ) -> Result<Self> {
        let grid = TimeGrid::uniform(params.residual_time, monitoring_steps)?;
        let generator = single_asset_generator(params, grid, config.seed)?;
        let pricer = BarrierPathPricer::new(
            barrier_type,
            barrier,
            rebate,
            params.option_type,
            params.underlying,
            params.strike,
            params.discount(),
            config.antithetic_variate,
        )?;
        Ok(Self {
            pricer: McPricer::new(generator, pricer, config.min_samples)?,
        })
    }
}

/// Market inputs of the multi-asset pricers.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiAssetMarket {
    /// Continuous dividend yield of each asset.
    pub dividend_yields: Array,
    /// Annual covariance of the log returns.
    pub covariance: Matrix,
    /// Continuous risk-free rate.
    pub risk_free_rate: Rate,
}

impl MultiAssetMarket {
    /// Bundle the inputs; sizes must agree.
    pub fn new(dividend_yields: Array, covariance: Matrix, risk_free_rate: Rate) -> Result<Self> {
        let n = dividend_yields.size();
        ensure_arg!(n > 0, "no assets given");
        ensure_arg!(
            covariance.rows() == n && covariance.cols() == n,
            "covariance matrix is {}x{} for {n} assets",
            covariance.rows(),
            covariance.cols()
        );
        Ok(Self {
            dividend_yields,
            covariance,
            risk_free_rate,
        })
    }

    /// Number of assets.
    pub fn asset_number(&self) -> Size {
        self.dividend_yields.size()
    }

    /// Log drifts `r − q_j − C_jj/2`.
    pub fn log_drifts(&self) -> Array {
        Array::from_fn(self.asset_number(), |j| {
            self.risk_free_rate - self.dividend_yields[j] - 0.5 * self.covariance[(j, j)]
        })
    }

    /// Discount factor to `t`.
    pub fn discount(&self, t: Time) -> DiscountFactor {
        (-self.risk_free_rate * t).exp()
    }

    fn generator(&self, grid: TimeGrid, seed: BigNatural) -> Result<StandardMultiPathGenerator> {
        MultiPathGenerator::new(
            self.log_drifts(),
            &self.covariance,
            grid,
            GaussianRandomGenerator::with_seed(seed),
        )
    }

    fn check_size(&self, what: &str, values: &Array) -> Result<()> {
        ensure_arg!(
            values.size() == self.asset_number(),
            "{} {what} for {} assets",
            values.size(),
            self.asset_number()
        );
        Ok(())
    }
}

mc_pricer_wrapper!(
    /// Option on the worst or best final price of a basket.
    McBasket,
    StandardMultiPathGenerator,
    BasketPathPricer
);

impl McBasket {
    /// Basket of assets starting at `underlyings`, expiring at `residual_time`.
    pub fn new(
        basket_type: BasketType,
        option_type: OptionType,
        underlyings: Array,
        strike: Real,
        market: &MultiAssetMarket,
        residual_time: Time,
        config: &McConfig,
    ) -> Result<Self> {
        market.check_size("underlyings", &underlyings)?;
        let generator = market.generator(TimeGrid::uniform(residual_time, 1)?, config.seed)?;
        let pricer = BasketPathPricer::new(
            basket_type,
            option_type,
            underlyings,
            strike,
            market.discount(residual_time),
            config.antithetic_variate,
        )?;
        Ok(Self {
            pricer: McPricer::new(generator, pricer, config.min_samples)?,
        })
    }
}

mc_pricer_wrapper!(
    /// Everest option.
    McEverest,
    StandardMultiPathGenerator,
    EverestPathPricer
);

impl McEverest {
    /// Option paying the worst relative performance at `residual_time`.
    pub fn new(market: &MultiAssetMarket, residual_time: Time, config: &McConfig) -> Result<Self> {
        let generator = market.generator(TimeGrid::uniform(residual_time, 1)?, config.seed)?;
        let pricer = EverestPathPricer::new(market.discount(residual_time), config.antithetic_variate)?;
        Ok(Self {
            pricer: McPricer::new(generator, pricer, config.min_samples)?,
        })
    }
}

mc_pricer_wrapper!(
    /// Himalaya option.
    McHimalaya,
    StandardMultiPathGenerator,
    HimalayaPathPricer
);

impl McHimalaya {
    /// Option on assets starting at `underlyings`, fixing at `fixing_times`
    /// and paid at the last fixing.
    pub fn new(
        underlyings: Array,
        strike: Real,
        market: &MultiAssetMarket,
        fixing_times: &[Time],
        config: &McConfig,
    ) -> Result<Self> {
        market.check_size("underlyings", &underlyings)?;
        check_fixing_times(fixing_times, Time::INFINITY)?;
        let expiry = fixing_times[fixing_times.len() - 1];
        let generator = market.generator(TimeGrid::from_times(fixing_times, 0)?, config.seed)?;
        let pricer = HimalayaPathPricer::new(
            underlyings,
            strike,
            market.discount(expiry),
            config.antithetic_variate,
        )?;
        Ok(Self {
            pricer: McPricer::new(generator, pricer, config.min_samples)?,
        })
    }
}

mc_pricer_wrapper!(
    /// Pagoda option.
    McPagoda,
    StandardMultiPathGenerator,
    PagodaPathPricer
);

impl McPagoda {
    /// Option on the `weights` portfolio fixing at `fixing_times` and paid
    /// at the last fixing.
    pub fn new(
        weights: Array,
        fraction: Real,
        roof: Real,
        market: &MultiAssetMarket,
        fixing_times: &[Time],
        config: &McConfig,
    ) -> Result<Self> {
        market.check_size("weights", &weights)?;
        check_fixing_times(fixing_times, Time::INFINITY)?;
        let expiry = fixing_times[fixing_times.len() - 1];
        let generator = market.generator(TimeGrid::from_times(fixing_times, 0)?, config.seed)?;
        let pricer = PagodaPathPricer::new(
            weights,
            fraction,
            roof,
            market.discount(expiry),
            config.antithetic_variate,
        )?;
        Ok(Self {
            pricer: McPricer::new(generator, pricer, config.min_samples)?,
        })
    }
}
