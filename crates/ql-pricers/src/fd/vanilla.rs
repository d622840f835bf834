//! European, American and shout options on a single finite-difference grid.

use tracing::{debug, instrument};

use ql_core::errors::Result;
use ql_core::{ensure_arg, Real, Size};
use ql_math::Array;
use ql_methods::finite_differences::{
    AmericanCondition, NullCondition, ShoutCondition, StepCondition,
};

use super::numerical_option::{grid_results, rollback_to_today, BsmNumericalOption};
use crate::config::FdConfig;
use crate::parameters::BsmParameters;
use crate::results::OptionResults;

fn price_with_condition<F>(
    option: &BsmNumericalOption,
    time_steps: Size,
    condition: F,
) -> Result<OptionResults>
where
    F: FnOnce(&Array) -> Box<dyn StepCondition>,
{
    let params = option.parameters();
    let t = params.residual_time;
    let (s_min, s_max) = option.grid_limits(params.underlying, t)?;
    let grid = option.grid(params.underlying, s_min, s_max)?;
    let intrinsic = option.intrinsic_values(&grid);
    let mut model = option.model(&grid, &intrinsic)?;
    let condition = condition(&intrinsic);

    let dt = t / time_steps as Real;
    let mut prices = intrinsic;
    let value_at_dt = rollback_to_today(
        &mut model,
        &mut prices,
        t,
        dt,
        time_steps - 1,
        condition.as_ref(),
    )?;
    grid_results(&prices, &grid, value_at_dt, dt)
}

macro_rules! fd_vanilla_option {
    ($(#[$meta:meta])* $name:ident, |$option:ident, $intrinsic:ident| $condition:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            option: BsmNumericalOption,
            time_steps: Size,
        }

        impl $name {
            /// Validate the inputs; `time_steps` must be at least 2.
            pub fn new(
                params: BsmParameters,
                time_steps: Size,
                grid_points: Size,
                config: FdConfig,
            ) -> Result<Self> {
                ensure_arg!(time_steps >= 2, "at least 2 time steps needed, got {time_steps}");
                Ok(Self {
                    option: BsmNumericalOption::new(params, grid_points, config)?,
                    time_steps,
                })
            }

            /// The grid machinery.
            pub fn numerical_option(&self) -> &BsmNumericalOption {
                &self.option
            }

            /// Number of time steps.
            pub fn time_steps(&self) -> Size {
                self.time_steps
            }

            /// Value and Greeks.
            #[instrument(skip_all, fields(option = stringify!($name)))]
            pub fn calculate(&self) -> Result<OptionResults> {
                let $option = &self.option;
                let results = price_with_condition(
                    &self.option,
                    self.time_steps,
                    |$intrinsic: &Array| -> Box<dyn StepCondition> { $condition },
                )?;
                debug!(
                    grid_points = self.option.grid_points(),
                    time_steps = self.time_steps,
                    value = results.value,
                    delta = results.delta,
                    "calculated"
                );
                Ok(results)
            }
        }
    };
}

fd_vanilla_option!(
    /// European option priced by backward rollback without early exercise.
    FdEuropeanOption,
    |_option, _intrinsic| Box::new(NullCondition)
);

fd_vanilla_option!(
    /// American option: the value is floored at the intrinsic value after
    /// every step.
    FdAmericanOption,
    |_option, intrinsic| Box::new(AmericanCondition::new(intrinsic.clone()))
);

fd_vanilla_option!(
    /// Shout option: once during its life the holder may lock in the
    /// intrinsic value, paid at expiry.
    FdShoutOption,
    |option, intrinsic| {
        let params = option.parameters();
        Box::new(ShoutCondition::new(
            intrinsic.clone(),
            params.residual_time,
            params.risk_free_rate,
        ))
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::OptionType;

    fn put() -> BsmParameters {
        BsmParameters::new(OptionType::Put, 100.0, 100.0, 0.0, 0.06, 1.0, 0.3)
    }

    #[test]
    fn one_time_step_is_rejected() {
        assert!(FdEuropeanOption::new(put(), 1, 101, FdConfig::default()).is_err());
        assert!(FdEuropeanOption::new(put(), 2, 101, FdConfig::default()).is_ok());
    }

    #[test]
    fn early_exercise_premium() {
        let c = FdConfig::default();
        let eu = FdEuropeanOption::new(put(), 200, 201, c.clone()).unwrap().calculate().unwrap();
        let am = FdAmericanOption::new(put(), 200, 201, c.clone()).unwrap().calculate().unwrap();
        let sh = FdShoutOption::new(put(), 200, 201, c).unwrap().calculate().unwrap();
        assert!(am.value > eu.value);
        assert!(sh.value >= eu.value);
        assert!(eu.delta < 0.0 && eu.gamma > 0.0);
    }
}
