use ql_core::errors::Result;
use ql_core::Real;

use super::{check_nodes, locate, Interpolation1D};

/// Natural cubic spline: twice continuously differentiable, with zero
/// curvature at both end nodes.
///
/// Beyond the nodes the spline continues along its end tangents.
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    xs: Vec<Real>,
    ys: Vec<Real>,
    // second derivatives at the nodes
    m: Vec<Real>,
}

impl NaturalCubicSpline {
    /// Fit a spline through the points `(xs[i], ys[i])`.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        let n = xs.len();
        let mut m = vec![0.0; n];
        if n > 2 {
            // tridiagonal system for m[1..n-1], forward sweep then back substitution
            let h: Vec<Real> = xs.windows(2).map(|w| w[1] - w[0]).collect();
            let k = n - 2;
            let mut c_prime = vec![0.0; k];
            let mut d_prime = vec![0.0; k];
            for j in 0..k {
                let i = j + 1;
                let a = h[i - 1];
                let b = 2.0 * (h[i - 1] + h[i]);
                let c = h[i];
                let d = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
                let (cp, dp) = if j == 0 {
                    (0.0, 0.0)
                } else {
                    (c_prime[j - 1], d_prime[j - 1])
                };
                let denom = b - a * cp;
                c_prime[j] = c / denom;
                d_prime[j] = (d - a * dp) / denom;
            }
            for j in (0..k).rev() {
                let next = if j + 1 < k { m[j + 2] } else { 0.0 };
                m[j + 1] = d_prime[j] - c_prime[j] * next;
            }
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            m,
        })
    }

    /// First derivative at `x`.
    pub fn derivative(&self, x: Real) -> Real {
        let n = self.xs.len();
        if x < self.xs[0] {
            return self.end_slope(0);
        }
        if x > self.xs[n - 1] {
            return self.end_slope(n - 1);
        }
        let i = locate(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        (self.ys[i + 1] - self.ys[i]) / h
            + h / 6.0 * ((1.0 - 3.0 * a * a) * self.m[i] + (3.0 * b * b - 1.0) * self.m[i + 1])
    }

    /// Second derivative at `x` (zero outside the nodes).
    pub fn second_derivative(&self, x: Real) -> Real {
        if !self.is_in_range(x) {
            return 0.0;
        }
        let i = locate(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let b = (x - self.xs[i]) / h;
        self.m[i] * (1.0 - b) + self.m[i + 1] * b
    }

    fn end_slope(&self, node: usize) -> Real {
        if node == 0 {
            let h = self.xs[1] - self.xs[0];
            (self.ys[1] - self.ys[0]) / h - h * (2.0 * self.m[0] + self.m[1]) / 6.0
        } else {
            let h = self.xs[node] - self.xs[node - 1];
            (self.ys[node] - self.ys[node - 1]) / h
                + h * (2.0 * self.m[node] + self.m[node - 1]) / 6.0
        }
    }
}

impl Interpolation1D for NaturalCubicSpline {
    fn value(&self, x: Real) -> Real {
        let n = self.xs.len();
        if x < self.xs[0] {
            return self.ys[0] + (x - self.xs[0]) * self.end_slope(0);
        }
        if x > self.xs[n - 1] {
            return self.ys[n - 1] + (x - self.xs[n - 1]) * self.end_slope(n - 1);
        }
        let i = locate(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = 1.0 - a;
        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}
