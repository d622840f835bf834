//! Bermudan options.

use ql_core::errors::Result;
use ql_core::{Size, Time};
use ql_math::Array;
use ql_methods::finite_differences::{NullCondition, StepCondition};
use ql_time::{BusinessDayConvention, Calendar, Date, DayCounter};

use super::multi_period::{FdMultiPeriodOption, FdState, IntermediateStep};
use super::numerical_option::BsmNumericalOption;
use crate::config::FdConfig;
use crate::dates::times_from_dates;
use crate::parameters::BsmParameters;
use crate::results::OptionResults;

/// Exercise at discrete dates: `prices = max(prices, intrinsic)` at each
/// date, nothing in between.
#[derive(Debug, Clone, Copy, Default)]
pub struct BermudanExercise;

impl IntermediateStep for BermudanExercise {
    fn step_condition(&self, _: &BsmNumericalOption, _: &Array) -> Box<dyn StepCondition> {
        Box::new(NullCondition)
    }

    fn execute_intermediate_step(
        &self,
        _: &BsmNumericalOption,
        state: &mut FdState,
        _index: Size,
        _time: Time,
    ) -> Result<()> {
        for (v, &e) in state.prices.iter_mut().zip(state.intrinsic.iter()) {
            *v = v.max(e);
        }
        Ok(())
    }
}

/// Option exercisable at a discrete set of times.
#[derive(Debug, Clone)]
pub struct FdBermudanOption {
    inner: FdMultiPeriodOption<BermudanExercise>,
}

impl FdBermudanOption {
    /// Option exercisable at `exercise_times`, strictly increasing in `[0, T]`.
    pub fn new(
        params: BsmParameters,
        exercise_times: Vec<Time>,
        time_steps_per_period: Size,
        grid_points: Size,
        config: FdConfig,
    ) -> Result<Self> {
        Ok(Self {
            inner: FdMultiPeriodOption::new(
                params,
                exercise_times,
                time_steps_per_period,
                grid_points,
                config,
                BermudanExercise,
            )?,
        })
    }

    /// Option exercisable at `dates`, each adjusted to a business day of
    /// `calendar` and measured from `reference` with `day_counter`.
    #[allow(clippy::too_many_arguments)]
    pub fn with_exercise_dates(
        params: BsmParameters,
        reference: Date,
        dates: &[Date],
        calendar: &dyn Calendar,
        convention: BusinessDayConvention,
        day_counter: &dyn DayCounter,
        time_steps_per_period: Size,
        grid_points: Size,
        config: FdConfig,
    ) -> Result<Self> {
        let adjusted: Vec<Date> = dates.iter().map(|&d| calendar.adjust(d, convention)).collect();
        let times = times_from_dates(reference, &adjusted, day_counter)?;
        Self::new(params, times, time_steps_per_period, grid_points, config)
    }

    /// Exercise times.
    pub fn exercise_times(&self) -> &[Time] {
        self.inner.event_times()
    }

    /// The grid machinery.
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
    use ql_time::{Actual365Fixed, WeekendsOnly};

    #[test]
    fn dates_are_adjusted_before_conversion() {
        let params = BsmParameters::new(OptionType::Put, 100.0, 100.0, 0.0, 0.05, 1.0, 0.2);
        let today = Date::from_ymd(2024, 1, 1).unwrap();
        // 2024-07-06 is a Saturday
        let saturday = Date::from_ymd(2024, 7, 6).unwrap();
        let option = FdBermudanOption::with_exercise_dates(
            params,
            today,
            &[saturday],
            &WeekendsOnly,
            BusinessDayConvention::Following,
            &Actual365Fixed,
            20,
            101,
            FdConfig::default(),
        )
        .unwrap();
        let monday = Date::from_ymd(2024, 7, 8).unwrap();
        let expected = Actual365Fixed.year_fraction(today, monday);
        assert_eq!(option.exercise_times(), &[expected]);
    }
}
