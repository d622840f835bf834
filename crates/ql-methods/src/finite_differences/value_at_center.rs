//! Values and derivatives of a grid function at the centre of its grid.

use ql_core::errors::Result;
use ql_core::{ensure_arg, Real};
use ql_math::Array;

/// Middle element of `a`, or the average of the two middle elements when
/// the size is even.
pub fn value_at_center(a: &Array) -> Result<Real> {
    let n = a.size();
    ensure_arg!(n > 0, "cannot take the centre of an empty array");
    let j = n / 2;
    Ok(if n % 2 == 1 { a[j] } else { (a[j] + a[j - 1]) / 2.0 })
}

fn check(a: &Array, grid: &Array, min_size: usize) -> Result<()> {
    ensure_arg!(
        a.size() == grid.size(),
        "values ({}) and grid ({}) differ in size",
        a.size(),
        grid.size()
    );
    ensure_arg!(
        a.size() >= min_size,
        "need at least {min_size} points, got {}",
        a.size()
    );
    Ok(())
}

/// First derivative of `a` with respect to `grid` at the centre.
pub fn first_derivative_at_center(a: &Array, grid: &Array) -> Result<Real> {
    check(a, grid, 3)?;
    let j = a.size() / 2;
    Ok(if a.size() % 2 == 1 {
        (a[j + 1] - a[j - 1]) / (grid[j + 1] - grid[j - 1])
    } else {
        (a[j] - a[j - 1]) / (grid[j] - grid[j - 1])
    })
}

/// Second derivative of `a` with respect to `grid` at the centre.
pub fn second_derivative_at_center(a: &Array, grid: &Array) -> Result<Real> {
    check(a, grid, 4)?;
    let j = a.size() / 2;
    Ok(if a.size() % 2 == 1 {
        let delta_plus = (a[j + 1] - a[j]) / (grid[j + 1] - grid[j]);
        let delta_minus = (a[j] - a[j - 1]) / (grid[j] - grid[j - 1]);
        let dx = (grid[j + 1] - grid[j - 1]) / 2.0;
        (delta_plus - delta_minus) / dx
    } else {
        let delta_plus = (a[j + 1] - a[j - 1]) / (grid[j + 1] - grid[j - 1]);
        let delta_minus = (a[j] - a[j - 2]) / (grid[j] - grid[j - 2]);
        (delta_plus - delta_minus) / (grid[j] - grid[j - 1])
    })
}
