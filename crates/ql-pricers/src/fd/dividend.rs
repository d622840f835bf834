//! Options on an underlying paying discrete cash dividends.

use ql_core::errors::Result;
use ql_core::{ensure_arg, Real, Size, Time};
use ql_math::Array;
use ql_methods::finite_differences::{
    shift_grid_for_dividend, AmericanCondition, NullCondition, ShoutCondition, StepCondition,
};

use super::multi_period::{FdMultiPeriodOption, FdState, IntermediateStep};
use super::numerical_option::BsmNumericalOption;
use crate::config::FdConfig;
use crate::parameters::BsmParameters;
use crate::results::OptionResults;

/// Exercise style of a dividend option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DividendExercise {
    /// Exercise at expiry only.
    #[default]
    European,
    /// Exercise at any time.
    American,
    /// One shout at any time, paid at expiry.
    Shout,
}

/// Cash dividends paid at the event times, with the exercise condition in
/// between.
#[derive(Debug, Clone)]
pub struct DividendSchedule {
    dividends: Vec<Real>,
    exercise: DividendExercise,
}

impl DividendSchedule {
    /// The dividend amounts.
    pub fn dividends(&self) -> &[Real] {
        &self.dividends
    }

    /// The exercise style.
    pub fn exercise(&self) -> DividendExercise {
        self.exercise
    }
}

impl IntermediateStep for DividendSchedule {
    fn step_condition(&self, option: &BsmNumericalOption, intrinsic: &Array) -> Box<dyn StepCondition> {
        match self.exercise {
            DividendExercise::European => Box::new(NullCondition),
            DividendExercise::American => Box::new(AmericanCondition::new(intrinsic.clone())),
            DividendExercise::Shout => {
                let params = option.parameters();
                Box::new(ShoutCondition::new(
                    intrinsic.clone(),
                    params.residual_time,
                    params.risk_free_rate,
                ))
            }
        }
    }

    fn execute_intermediate_step(
        &self,
        option: &BsmNumericalOption,
        state: &mut FdState,
        index: Size,
        time: Time,
    ) -> Result<()> {
        let dividend = self.dividends[index];
        // before the ex-date every grid price carries the dividend
        let old_grid = &state.grid.prices + dividend;
        let center = state.grid.center + dividend;
        let new_s_min = state.grid.s_min() + dividend;
        let new_s_max = state.grid.s_max() + dividend;

        let (mut s_min, mut s_max) = option.grid_limits(center, time)?;
        if s_min < new_s_min {
            s_min = new_s_min;
            s_max = center / (s_min / center);
        }
        if s_max > new_s_max {
            s_max = new_s_max;
            s_min = center / (s_max / center);
        }
        let grid = option.grid(center, s_min, s_max)?;
        shift_grid_for_dividend(&mut state.prices, &grid.prices, &old_grid)?;

        let intrinsic = option.intrinsic_values(&grid);
        state.model = option.model(&grid, &intrinsic)?;
        state.condition = self.step_condition(option, &intrinsic);
        state.intrinsic = intrinsic;
        state.grid = grid;
        state.condition.apply_to(&mut state.prices, time)
    }
}

/// Vanilla option on an underlying paying cash dividends at known times.
///
/// The grid is built around the underlying net of all dividends and is
/// shifted up by each dividend as the rollback crosses its ex-date.
#[derive(Debug, Clone)]
pub struct FdDividendOption {
    inner: FdMultiPeriodOption<DividendSchedule>,
}

impl FdDividendOption {
    /// `dividends[i]` is paid at `ex_dividend_times[i]`; the times must be
    /// strictly increasing inside `(0, T)`.
    pub fn new(
        params: BsmParameters,
        exercise: DividendExercise,
        dividends: Vec<Real>,
        ex_dividend_times: Vec<Time>,
        time_steps_per_period: Size,
        grid_points: Size,
        config: FdConfig,
    ) -> Result<Self> {
        ensure_arg!(
            dividends.len() == ex_dividend_times.len(),
            "{} dividends but {} ex-dividend times",
            dividends.len(),
            ex_dividend_times.len()
        );
        ensure_arg!(
            dividends.iter().all(|d| *d >= 0.0 && d.is_finite()),
            "dividends must be non-negative: {dividends:?}"
        );
        ensure_arg!(
            ex_dividend_times
                .iter()
                .all(|&t| t > 0.0 && t < params.residual_time),
            "ex-dividend times must lie in (0, {}): {ex_dividend_times:?}",
            params.residual_time
        );
        let total: Real = dividends.iter().sum();
        let adjusted = BsmParameters {
            underlying: params.underlying - total,
            ..params
        };
        ensure_arg!(
            adjusted.underlying > 0.0,
            "dividends ({total}) exceed the underlying ({})",
            params.underlying
        );
        Ok(Self {
            inner: FdMultiPeriodOption::new(
                adjusted,
                ex_dividend_times,
                time_steps_per_period,
                grid_points,
                config,
                DividendSchedule {
                    dividends,
                    exercise,
                },
            )?,
        })
    }

    /// Ex-dividend times.
    pub fn ex_dividend_times(&self) -> &[Time] {
        self.inner.event_times()
    }

    /// Dividend amounts and exercise style.
    pub fn schedule(&self) -> &DividendSchedule {
        self.inner.intermediate_step()
    }

    /// The grid machinery, built on the dividend-adjusted underlying.
    pub fn numerical_option(&self) -> &BsmNumericalOption {
        self.inner.numerical_option()
    }

    /// Value and Greeks.
    pub fn calculate(&self) -> Result<OptionResults> {
        self.inner.calculate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::OptionType;

    fn call() -> BsmParameters {
        BsmParameters::new(OptionType::Call, 100.0, 100.0, 0.0, 0.05, 1.0, 0.2)
    }

    #[test]
    fn underlying_is_net_of_dividends() {
        let option = FdDividendOption::new(
            call(),
            DividendExercise::European,
            vec![2.0, 3.0],
            vec![0.25, 0.75],
            20,
            101,
            FdConfig::default(),
        )
        .unwrap();
        assert_eq!(option.numerical_option().parameters().underlying, 95.0);
        assert_eq!(option.schedule().dividends(), &[2.0, 3.0]);
    }

    #[test]
    fn inputs_are_validated() {
        let build = |d: Vec<Real>, t: Vec<Time>| {
            FdDividendOption::new(call(), DividendExercise::American, d, t, 20, 101, FdConfig::default())
        };
        assert!(build(vec![1.0], vec![]).is_err());
        assert!(build(vec![-1.0], vec![0.5]).is_err());
        assert!(build(vec![1.0], vec![1.0]).is_err());
        assert!(build(vec![150.0], vec![0.5]).is_err());
    }

    #[test]
    fn dividends_lower_a_call() {
        let price = |d: Real| {
            FdDividendOption::new(call(), DividendExercise::European, vec![d], vec![0.5], 50, 201, FdConfig::default())
                .unwrap()
                .calculate()
                .unwrap()
                .value
        };
        assert!(price(5.0) < price(0.0) - 1.0);
    }
}
