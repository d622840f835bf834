//! 1D interpolation on sorted nodes.

mod cubic_spline;

pub use cubic_spline::NaturalCubicSpline;

use ql_core::errors::Result;
use ql_core::{ensure_arg, Real};

/// A function `f: R → R` interpolating a set of known points.
pub trait Interpolation1D: std::fmt::Debug {
    /// Evaluate at `x`. Outside `[x_min, x_max]` the value is extrapolated.
    fn value(&self, x: Real) -> Real;

    /// Smallest node.
    fn x_min(&self) -> Real;

    /// Largest node.
    fn x_max(&self) -> Real;

    /// Return `true` if `x` lies within the node range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

fn check_nodes(xs: &[Real], ys: &[Real]) -> Result<()> {
    ensure_arg!(xs.len() >= 2, "at least two points are needed, got {}", xs.len());
    ensure_arg!(
        xs.len() == ys.len(),
        "abscissae ({}) and ordinates ({}) differ in length",
        xs.len(),
        ys.len()
    );
    ensure_arg!(
        xs.windows(2).all(|w| w[1] > w[0]),
        "abscissae must be strictly increasing"
    );
    Ok(())
}

/// Index `i` of the interval `[xs[i], xs[i+1]]` used to evaluate at `x`,
/// clamped to the first and last intervals.
fn locate(xs: &[Real], x: Real) -> usize {
    let n = xs.len();
    match xs.partition_point(|&node| node <= x) {
        0 => 0,
        k if k >= n => n - 2,
        k => k - 1,
    }
}

/// Piecewise-linear interpolation, extrapolating the end segments.
#[derive(Debug, Clone)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
}

impl LinearInterpolation {
    /// Interpolate the points `(xs[i], ys[i])`.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }
}

impl Interpolation1D for LinearInterpolation {
    fn value(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let slope = (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i]);
        self.ys[i] + (x - self.xs[i]) * slope
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_interpolates_and_extrapolates() {
        let f = LinearInterpolation::new(&[0.0, 1.0, 3.0], &[0.0, 2.0, 3.0]).unwrap();
        assert_eq!(f.value(0.5), 1.0);
        assert_eq!(f.value(2.0), 2.5);
        assert_eq!(f.value(-1.0), -2.0);
        assert_eq!(f.value(5.0), 4.0);
        assert!(f.is_in_range(3.0) && !f.is_in_range(3.1));
    }

    #[test]
    fn rejects_bad_nodes() {
        assert!(LinearInterpolation::new(&[0.0], &[1.0]).is_err());
        assert!(LinearInterpolation::new(&[0.0, 1.0], &[1.0]).is_err());
        assert!(LinearInterpolation::new(&[0.0, 0.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn locate_clamps() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(locate(&xs, -5.0), 0);
        assert_eq!(locate(&xs, 0.0), 0);
        assert_eq!(locate(&xs, 1.5), 1);
        assert_eq!(locate(&xs, 3.0), 2);
        assert_eq!(locate(&xs, 9.0), 2);
    }
}
