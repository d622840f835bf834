//! Rollback through a schedule of event times.

use tracing::{debug, instrument, trace};

use ql_core::errors::Result;
use ql_core::{ensure_arg, Real, Size, Time};
use ql_math::Array;
use ql_methods::finite_differences::{value_at_center, StepCondition};
use ql_methods::FiniteDifferenceModel;

use super::numerical_option::{grid_results, BsmNumericalOption, FdGrid};
use crate::config::FdConfig;
use crate::parameters::BsmParameters;
use crate::results::OptionResults;

/// Event times this close to 0 or to expiry are executed at the boundary.
pub const EVENT_TIME_TOLERANCE: Time = 1e-10;

/// Everything the rollback carries between events.
pub struct FdState {
    /// Current grid.
    pub grid: FdGrid,
    /// Intrinsic values on `grid`.
    pub intrinsic: Array,
    /// Option values on `grid`.
    pub prices: Array,
    /// Model for `grid`.
    pub model: FiniteDifferenceModel,
    /// Condition applied after every step.
    pub condition: Box<dyn StepCondition>,
}

/// What happens at each event time of a multi-period option.
pub trait IntermediateStep {
    /// Condition applied after every step between events.
    fn step_condition(&self, option: &BsmNumericalOption, intrinsic: &Array) -> Box<dyn StepCondition>;

    /// Act on `state` at the event `index`, occurring at `time`.
    fn execute_intermediate_step(
        &self,
        option: &BsmNumericalOption,
        state: &mut FdState,
        index: Size,
        time: Time,
    ) -> Result<()>;
}

/// Finite-difference option whose rollback stops at a list of event times.
#[derive(Debug, Clone)]
pub struct FdMultiPeriodOption<S> {
    option: BsmNumericalOption,
    event_times: Vec<Time>,
    time_steps_per_period: Size,
    step: S,
}

impl<S: IntermediateStep> FdMultiPeriodOption<S> {
    /// `event_times` must be strictly increasing and lie in `[0, T]`.
    pub fn new(
        params: BsmParameters,
        event_times: Vec<Time>,
        time_steps_per_period: Size,
        grid_points: Size,
        config: FdConfig,
        step: S,
    ) -> Result<Self> {
        ensure_arg!(
            time_steps_per_period >= 2,
            "at least 2 time steps per period needed, got {time_steps_per_period}"
        );
        let option = BsmNumericalOption::new(params, grid_points, config)?;
        let expiry = option.parameters().residual_time;
        ensure_arg!(
            event_times.windows(2).all(|w| w[0] < w[1]),
            "event times must be strictly increasing: {event_times:?}"
        );
        ensure_arg!(
            event_times
                .iter()
                .all(|&t| t >= -EVENT_TIME_TOLERANCE && t <= expiry + EVENT_TIME_TOLERANCE),
            "event times must lie in [0, {expiry}]: {event_times:?}"
        );
        Ok(Self {
            option,
            event_times,
            time_steps_per_period,
            step,
        })
    }

    /// The grid machinery.
    pub fn numerical_option(&self) -> &BsmNumericalOption {
        &self.option
    }

    /// The event times.
    pub fn event_times(&self) -> &[Time] {
        &self.event_times
    }

    /// The per-event behaviour.
    pub fn intermediate_step(&self) -> &S {
        &self.step
    }

    /// Value and Greeks.
    #[instrument(skip_all, fields(events = self.event_times.len()))]
    pub fn calculate(&self) -> Result<OptionResults> {
        let params = self.option.parameters();
        let expiry = params.residual_time;
        let (s_min, s_max) = self.option.grid_limits(params.underlying, expiry)?;
        let grid = self.option.grid(params.underlying, s_min, s_max)?;
        let intrinsic = self.option.intrinsic_values(&grid);
        let mut state = FdState {
            model: self.option.model(&grid, &intrinsic)?,
            condition: self.step.step_condition(&self.option, &intrinsic),
            prices: intrinsic.clone(),
            intrinsic,
            grid,
        };

        let at_zero = |t: Time| t <= EVENT_TIME_TOLERANCE;
        let at_expiry = |t: Time| (t - expiry).abs() <= EVENT_TIME_TOLERANCE;
        let interior: Vec<(Size, Time)> = self
            .event_times
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, t)| !at_zero(t) && !at_expiry(t))
            .collect();

        let steps = self.time_steps_per_period;
        let mut dt = expiry / (steps * (self.event_times.len() + 1)) as Real;
        if let Some(&(_, first)) = interior.first() {
            if first <= dt {
                dt = first / 2.0;
            }
        }
        debug!(dt, interior = interior.len(), "multi-period rollback");

        for (index, &t) in self.event_times.iter().enumerate() {
            if at_expiry(t) {
                self.step
                    .execute_intermediate_step(&self.option, &mut state, index, expiry)?;
            }
        }

        let mut begin = expiry;
        for &(index, t) in interior.iter().rev() {
            state.model.rollback(
                &mut state.prices,
                begin,
                t,
                steps,
                Some(state.condition.as_ref()),
            )?;
            trace!(index, time = t, "event");
            self.step
                .execute_intermediate_step(&self.option, &mut state, index, t)?;
            begin = t;
        }

        state
            .model
            .rollback(&mut state.prices, begin, dt, steps, Some(state.condition.as_ref()))?;
        let value_at_dt = value_at_center(&state.prices)?;
        state
            .model
            .rollback(&mut state.prices, dt, 0.0, 1, Some(state.condition.as_ref()))?;

        for (index, &t) in self.event_times.iter().enumerate() {
            if at_zero(t) {
                self.step
                    .execute_intermediate_step(&self.option, &mut state, index, 0.0)?;
            }
        }

        let results = grid_results(&state.prices, &state.grid, value_at_dt, dt)?;
        debug!(value = results.value, delta = results.delta, "calculated");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::OptionType;
    use ql_methods::finite_differences::NullCondition;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Recorder {
        calls: AtomicUsize,
        last_index: AtomicUsize,
    }

    impl IntermediateStep for Recorder {
        fn step_condition(&self, _: &BsmNumericalOption, _: &Array) -> Box<dyn StepCondition> {
            Box::new(NullCondition)
        }

        fn execute_intermediate_step(
            &self,
            _: &BsmNumericalOption,
            _: &mut FdState,
            index: Size,
            _: Time,
        ) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_index.store(index, Ordering::SeqCst);
            Ok(())
        }
    }

    fn params() -> BsmParameters {
        BsmParameters::new(OptionType::Call, 100.0, 100.0, 0.0, 0.05, 1.0, 0.2)
    }

    #[test]
    fn every_event_fires_once() {
        let option = FdMultiPeriodOption::new(
            params(),
            vec![0.0, 0.25, 0.5, 1.0],
            20,
            101,
            FdConfig::default(),
            Recorder::default(),
        )
        .unwrap();
        option.calculate().unwrap();
        assert_eq!(option.intermediate_step().calls.load(Ordering::SeqCst), 4);
        // the event at 0 fires last
        assert_eq!(option.intermediate_step().last_index.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn event_times_are_validated() {
        let build = |times: Vec<Time>| {
            FdMultiPeriodOption::new(params(), times, 10, 101, FdConfig::default(), Recorder::default())
        };
        assert!(build(vec![0.5, 0.25]).is_err());
        assert!(build(vec![0.5, 1.5]).is_err());
        assert!(build(vec![-0.1]).is_err());
        assert!(build(vec![]).is_ok());
    }
}
