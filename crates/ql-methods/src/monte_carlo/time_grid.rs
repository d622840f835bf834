//! Discretisation of the simulation horizon.

use ql_core::errors::Result;
use ql_core::{ensure_arg, Size, Time};

const TIME_TOLERANCE: Time = 1e-12;

/// Increasing sequence of times starting at zero.
///
/// Grids built by [`from_times`](Self::from_times) contain each mandatory
/// time exactly, with the intervals between them split evenly.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<Time>,
    dt: Vec<Time>,
    mandatory: Vec<Time>,
}

impl TimeGrid {
    /// `steps` equal steps from 0 to `end`.
    pub fn uniform(end: Time, steps: Size) -> Result<Self> {
        ensure_arg!(end > 0.0 && end.is_finite(), "negative or null end time ({end})");
        ensure_arg!(steps > 0, "at least one step required");
        let dt = end / steps as Time;
        let mut times: Vec<Time> = (0..=steps).map(|i| dt * i as Time).collect();
        times[steps] = end;
        Ok(Self::from_points(times, vec![end]))
    }

    /// Grid containing every time in `mandatory`, with about `steps` steps
    /// overall and at least one step per mandatory interval.
    pub fn from_times(mandatory: &[Time], steps: Size) -> Result<Self> {
        ensure_arg!(!mandatory.is_empty(), "empty list of mandatory times");
        ensure_arg!(
            mandatory.iter().all(|t| *t >= 0.0 && t.is_finite()),
            "mandatory times must be non-negative"
        );
        let mut sorted = mandatory.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted.dedup_by(|a, b| (*a - *b).abs() <= TIME_TOLERANCE);
        let last = sorted[sorted.len() - 1];
        ensure_arg!(last > 0.0, "the last mandatory time must be positive");

        let dt_max = if steps == 0 {
            // one step per mandatory interval
            Time::INFINITY
        } else {
            last / steps as Time
        };
        let mut times = vec![0.0];
        let mut begin = 0.0;
        for &end in &sorted {
            if end <= TIME_TOLERANCE {
                continue;
            }
            let n = (((end - begin) / dt_max).round() as Size).max(1);
            let dt = (end - begin) / n as Time;
            for k in 1..n {
                times.push(begin + dt * k as Time);
            }
            times.push(end);
            begin = end;
        }
        Ok(Self::from_points(times, sorted))
    }

    fn from_points(times: Vec<Time>, mandatory: Vec<Time>) -> Self {
        let dt = times.windows(2).map(|w| w[1] - w[0]).collect();
        Self {
            times,
            dt,
            mandatory,
        }
    }

    /// All grid points, starting with 0.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Number of grid points.
    pub fn len(&self) -> Size {
        self.times.len()
    }

    /// Always `false`: a grid holds at least the origin.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of steps (`len() − 1`).
    pub fn steps(&self) -> Size {
        self.dt.len()
    }

    /// Length of step `i`, between `times()[i]` and `times()[i + 1]`.
    pub fn dt(&self, i: Size) -> Time {
        self.dt[i]
    }

    /// Step lengths.
    pub fn dts(&self) -> &[Time] {
        &self.dt
    }

    /// Sorted, de-duplicated mandatory times.
    pub fn mandatory_times(&self) -> &[Time] {
        &self.mandatory
    }

    /// Last grid point.
    pub fn end(&self) -> Time {
        self.times[self.times.len() - 1]
    }

    /// Index of the grid point at `t`, which must lie on the grid.
    pub fn index(&self, t: Time) -> Result<Size> {
        let i = self.times.partition_point(|&x| x < t - TIME_TOLERANCE);
        ensure_arg!(
            i < self.times.len() && (self.times[i] - t).abs() <= TIME_TOLERANCE.max(t.abs() * 1e-12),
            "time {t} is not on the grid"
        );
        Ok(i)
    }
}
