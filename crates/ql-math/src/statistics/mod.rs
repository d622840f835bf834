//! Weighted sample statistics.
//!
//! [`Statistics`] accumulates weighted power sums and derives the moments on
//! demand. Accumulators can be [merged](Statistics::merge), so independent
//! streams (e.g. one per worker thread) combine into the same result as a
//! single sequential run.

use ql_core::errors::Result;
use ql_core::{ensure, ensure_arg, ensure_post, Real, Size};

/// Incremental accumulator of weighted samples.
///
/// Every query whose statistical requirement is not met (too few samples,
/// zero total weight) fails with a precondition error instead of returning a
/// meaningless number.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    samples: Size,
    weight_sum: Real,
    sum: Real,
    quadratic_sum: Real,
    cubic_sum: Real,
    fourth_power_sum: Real,
    min: Real,
    max: Real,
    downside_samples: Size,
    downside_weight_sum: Real,
    downside_quadratic_sum: Real,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self {
            samples: 0,
            weight_sum: 0.0,
            sum: 0.0,
            quadratic_sum: 0.0,
            cubic_sum: 0.0,
            fourth_power_sum: 0.0,
            min: Real::INFINITY,
            max: Real::NEG_INFINITY,
            downside_samples: 0,
            downside_weight_sum: 0.0,
            downside_quadratic_sum: 0.0,
        }
    }

    /// Discard all data.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Add a sample with unit weight.
    pub fn add(&mut self, value: Real) {
        self.accumulate(value, 1.0);
    }

    /// Add a weighted sample. Negative weights are rejected and leave the
    /// accumulator untouched.
    pub fn add_weighted(&mut self, value: Real, weight: Real) -> Result<()> {
        ensure!(weight >= 0.0, "negative weight ({weight}) not allowed");
        self.accumulate(value, weight);
        Ok(())
    }

    /// Add every value of `values` with unit weight.
    pub fn add_sequence(&mut self, values: &[Real]) {
        for &v in values {
            self.add(v);
        }
    }

    /// Add `values[i]` with weight `weights[i]`.
    ///
    /// The whole sequence is validated before anything is added.
    pub fn add_weighted_sequence(&mut self, values: &[Real], weights: &[Real]) -> Result<()> {
        ensure_arg!(
            values.len() == weights.len(),
            "values ({}) and weights ({}) differ in length",
            values.len(),
            weights.len()
        );
        ensure!(
            weights.iter().all(|w| *w >= 0.0),
            "negative weights not allowed"
        );
        for (&v, &w) in values.iter().zip(weights) {
            self.accumulate(v, w);
        }
        Ok(())
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &Statistics) {
        self.samples += other.samples;
        self.weight_sum += other.weight_sum;
        self.sum += other.sum;
        self.quadratic_sum += other.quadratic_sum;
        self.cubic_sum += other.cubic_sum;
        self.fourth_power_sum += other.fourth_power_sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.downside_samples += other.downside_samples;
        self.downside_weight_sum += other.downside_weight_sum;
        self.downside_quadratic_sum += other.downside_quadratic_sum;
    }

    fn accumulate(&mut self, value: Real, weight: Real) {
        let wx = weight * value;
        let wx2 = wx * value;
        self.samples += 1;
        self.weight_sum += weight;
        self.sum += wx;
        self.quadratic_sum += wx2;
        self.cubic_sum += wx2 * value;
        self.fourth_power_sum += wx2 * value * value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        if value < 0.0 {
            self.downside_samples += 1;
            self.downside_weight_sum += weight;
            self.downside_quadratic_sum += wx2;
        }
    }

    // ── Inspectors ───────────────────────────────────────────────────────

    /// Number of samples collected.
    pub fn samples(&self) -> Size {
        self.samples
    }

    /// Sum of the weights of the collected samples.
    pub fn weight_sum(&self) -> Real {
        self.weight_sum
    }

    /// Weighted mean `Σwx / Σw`.
    pub fn mean(&self) -> Result<Real> {
        ensure!(self.weight_sum > 0.0, "sum of weights must be positive");
        Ok(self.sum / self.weight_sum)
    }

    /// Unbiased weighted variance `(Σwx²/Σw − mean²) · N/(N−1)`.
    ///
    /// Exactly zero when all samples coincide. Negative round-off within
    /// `1e-12` of the second moment `Σwx²/Σw` is reported as zero.
    pub fn variance(&self) -> Result<Real> {
        ensure!(
            self.samples > 1,
            "sample number ({}) must be greater than one",
            self.samples
        );
        let m = self.mean()?;
        if self.min == self.max {
            return Ok(0.0);
        }
        let n = self.samples as Real;
        let second_moment = self.quadratic_sum / self.weight_sum;
        let v = (second_moment - m * m) * n / (n - 1.0);
        if v < 0.0 && -v <= 1e-12 * second_moment {
            return Ok(0.0);
        }
        ensure_post!(v >= 0.0, "negative variance ({v})");
        Ok(v)
    }

    /// Square root of [`variance`](Self::variance).
    pub fn standard_deviation(&self) -> Result<Real> {
        Ok(self.variance()?.sqrt())
    }

    /// Error estimate of the mean, `sqrt(variance / N)`.
    pub fn error_estimate(&self) -> Result<Real> {
        let v = self.variance()?;
        Ok((v / self.samples as Real).sqrt())
    }

    /// Bias-corrected sample skewness; zero for a degenerate sample.
    pub fn skewness(&self) -> Result<Real> {
        ensure!(
            self.samples > 2,
            "sample number ({}) must be greater than two",
            self.samples
        );
        let s = self.standard_deviation()?;
        if s == 0.0 {
            return Ok(0.0);
        }
        let m = self.mean()?;
        let w = self.weight_sum;
        let n = self.samples as Real;
        let third = self.cubic_sum / w - 3.0 * m * self.quadratic_sum / w + 2.0 * m * m * m;
        Ok(third / (s * s * s) * (n / (n - 1.0)) * (n / (n - 2.0)))
    }

    /// Bias-corrected excess kurtosis; zero for a degenerate sample.
    pub fn kurtosis(&self) -> Result<Real> {
        ensure!(
            self.samples > 3,
            "sample number ({}) must be greater than three",
            self.samples
        );
        let v = self.variance()?;
        if v == 0.0 {
            return Ok(0.0);
        }
        let n = self.samples as Real;
        let c = 3.0 * (n - 1.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0));
        let m = self.mean()?;
        let w = self.weight_sum;
        let m2 = m * m;
        let fourth = self.fourth_power_sum / w - 4.0 * m * self.cubic_sum / w
            + 6.0 * m2 * self.quadratic_sum / w
            - 3.0 * m2 * m2;
        Ok(fourth / (v * v)
            * (n / (n - 1.0))
            * (n / (n - 2.0))
            * ((n + 1.0) / (n - 3.0))
            - c)
    }

    /// Weighted second moment of the negative samples, Bessel-corrected.
    ///
    /// Zero when no negative sample has been seen.
    pub fn downside_variance(&self) -> Result<Real> {
        if self.downside_samples == 0 {
            return Ok(0.0);
        }
        ensure!(
            self.downside_samples > 1,
            "downside sample number ({}) must be greater than one",
            self.downside_samples
        );
        ensure!(
            self.downside_weight_sum > 0.0,
            "sum of downside weights must be positive"
        );
        let n = self.downside_samples as Real;
        Ok(self.downside_quadratic_sum / self.downside_weight_sum * n / (n - 1.0))
    }

    /// Downside deviation, the square root of the downside variance.
    pub fn downside_deviation(&self) -> Result<Real> {
        Ok(self.downside_variance()?.sqrt())
    }

    /// Smallest sample.
    pub fn min(&self) -> Result<Real> {
        ensure!(self.samples > 0, "empty sample set");
        Ok(self.min)
    }

    /// Largest sample.
    pub fn max(&self) -> Result<Real> {
        ensure!(self.samples > 0, "empty sample set");
        Ok(self.max)
    }
}

impl Extend<Real> for Statistics {
    fn extend<I: IntoIterator<Item = Real>>(&mut self, iter: I) {
        for v in iter {
            self.add(v);
        }
    }
}
