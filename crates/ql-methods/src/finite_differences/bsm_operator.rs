//! Black-Scholes-Merton differential operators.
//!
//! The operators store `−L`, where `L` is the Black-Scholes generator, so
//! that a backward step over `dt` solves or applies `I + dt·D`.

use std::fmt;
use std::sync::Arc;

use ql_core::errors::Result;
use ql_core::{ensure, ensure_arg, Rate, Real, Size, Time, Volatility};
use ql_math::Array;

use super::tridiagonal_operator::{TimeSetter, TridiagonalOperator};

/// Time-dependent volatility `σ(t)`.
pub type VolatilityFn = Arc<dyn Fn(Time) -> Volatility + Send + Sync>;

/// Constructors for Black-Scholes-Merton operators.
pub struct BsmOperator;

/// Interior coefficients `(pd, pm, pu)` of the log-space operator.
fn log_space_coefficients(dx: Real, r: Rate, q: Rate, sigma: Volatility) -> (Real, Real, Real) {
    let sigma2 = sigma * sigma;
    let nu = r - q - sigma2 / 2.0;
    let pd = -(sigma2 / dx - nu) / (2.0 * dx);
    let pu = -(sigma2 / dx + nu) / (2.0 * dx);
    let pm = sigma2 / (dx * dx) + r;
    (pd, pm, pu)
}

impl BsmOperator {
    /// Operator in `x = ln S` on a uniform grid of `size` points spaced `dx`.
    ///
    /// Edge rows are left empty; boundary conditions supply them.
    pub fn log_space(
        size: Size,
        dx: Real,
        r: Rate,
        q: Rate,
        sigma: Volatility,
    ) -> Result<TridiagonalOperator> {
        ensure_arg!(size >= 3, "BSM operator needs at least 3 points, got {size}");
        ensure_arg!(dx > 0.0, "grid spacing must be positive, got {dx}");
        ensure_arg!(sigma >= 0.0, "negative volatility ({sigma})");
        let (pd, pm, pu) = log_space_coefficients(dx, r, q, sigma);
        let mut op = TridiagonalOperator::new(size)?;
        op.set_mid_rows(pd, pm, pu);
        Ok(op)
    }

    /// Operator in price space on an arbitrary increasing grid of prices.
    ///
    /// Uses the three-point non-uniform stencils for `∂S` and `∂²S`.
    pub fn price_space(
        grid: &Array,
        r: Rate,
        q: Rate,
        sigma: Volatility,
    ) -> Result<TridiagonalOperator> {
        let n = grid.size();
        ensure_arg!(n >= 3, "BSM operator needs at least 3 points, got {n}");
        ensure_arg!(sigma >= 0.0, "negative volatility ({sigma})");
        let mut op = TridiagonalOperator::new(n)?;
        let sigma2 = sigma * sigma;
        for i in 1..n - 1 {
            let (s, hm, hp) = (grid[i], grid[i] - grid[i - 1], grid[i + 1] - grid[i]);
            ensure_arg!(hm > 0.0 && hp > 0.0, "grid must be strictly increasing at {i}");
            let drift = (r - q) * s;
            let diffusion = sigma2 * s * s;
            let pd = -(diffusion / (hm * (hm + hp)) - drift * hp / (hm * (hm + hp)));
            let pu = -(diffusion / (hp * (hm + hp)) + drift * hm / (hp * (hm + hp)));
            let pm = diffusion / (hm * hp) - drift * (hp - hm) / (hm * hp) + r;
            op.set_mid_row(i, pd, pm, pu)?;
        }
        Ok(op)
    }

    /// Log-space operator whose volatility follows `vol(t)`.
    pub fn time_dependent(
        size: Size,
        dx: Real,
        r: Rate,
        q: Rate,
        vol: VolatilityFn,
    ) -> Result<TridiagonalOperator> {
        let setter = BsmVolatilitySetter { dx, r, q, vol };
        let mut op = Self::log_space(size, dx, r, q, (setter.vol)(0.0))?;
        op.set_time_setter(Arc::new(setter));
        Ok(op)
    }
}

struct BsmVolatilitySetter {
    dx: Real,
    r: Rate,
    q: Rate,
    vol: VolatilityFn,
}

impl fmt::Debug for BsmVolatilitySetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BsmVolatilitySetter")
            .field("dx", &self.dx)
            .field("r", &self.r)
            .field("q", &self.q)
            .finish_non_exhaustive()
    }
}

impl TimeSetter for BsmVolatilitySetter {
    fn set_time(&self, t: Time, op: &mut TridiagonalOperator) -> Result<()> {
        let sigma = (self.vol)(t);
        ensure!(sigma >= 0.0 && sigma.is_finite(), "invalid volatility {sigma} at t = {t}");
        let (pd, pm, pu) = log_space_coefficients(self.dx, self.r, self.q, sigma);
        op.set_mid_rows(pd, pm, pu);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_space_coefficients_match_closed_form() {
        let (dx, r, q, s) = (0.01, 0.05, 0.02, 0.2);
        let op = BsmOperator::log_space(5, dx, r, q, s).unwrap();
        let nu = r - q - s * s / 2.0;
        assert!((op.lower()[0] + (s * s / dx - nu) / (2.0 * dx)).abs() < 1e-9);
        assert!((op.diagonal()[2] - (s * s / (dx * dx) + r)).abs() < 1e-9);
        assert!((op.upper()[1] + (s * s / dx + nu) / (2.0 * dx)).abs() < 1e-9);
        // rows of -L sum to r
        let row = op.lower()[1] + op.diagonal()[2] + op.upper()[2];
        assert!((row - r).abs() < 1e-9);
        assert_eq!(op.diagonal()[0], 0.0);
    }

    #[test]
    fn price_space_annihilates_forward() {
        // the stencils are exact on S, and -L S = q S
        let grid = Array::from_fn(7, |i| 80.0 + 7.0 * i as Real + 0.5 * (i * i) as Real);
        let (r, q) = (0.05, 0.01);
        let op = BsmOperator::price_space(&grid, r, q, 0.3).unwrap();
        let out = op.apply_to(&grid).unwrap();
        for i in 1..6 {
            assert!((out[i] - q * grid[i]).abs() < 1e-9, "row {i}: {}", out[i]);
        }
    }

    #[test]
    fn time_dependent_tracks_volatility() {
        let vol: VolatilityFn = Arc::new(|t: Time| 0.1 + 0.1 * t);
        let mut op = BsmOperator::time_dependent(5, 0.05, 0.03, 0.0, vol).unwrap();
        assert!(op.is_time_dependent());
        let before = op.diagonal()[2];
        op.set_time(1.0).unwrap();
        let expected = 0.04 / 0.0025 + 0.03;
        assert!((op.diagonal()[2] - expected).abs() < 1e-9);
        assert!(op.diagonal()[2] > before);
    }
}
