//! Elementary difference operators on a uniform grid of spacing `h`.
//!
//! Interior rows follow the usual stencils; edge rows fall back to one-sided
//! differences so that every operator is defined on the whole grid.

use ql_core::errors::Result;
use ql_core::{ensure_arg, Real, Size};

use super::tridiagonal_operator::TridiagonalOperator;

fn check(size: Size, h: Real) -> Result<()> {
    ensure_arg!(size >= 3, "difference operators need at least 3 points, got {size}");
    ensure_arg!(h > 0.0 && h.is_finite(), "grid spacing must be positive, got {h}");
    Ok(())
}

/// Forward difference `D₊`: rows `(0, −1/h, 1/h)`, last row backward.
pub fn d_plus(size: Size, h: Real) -> Result<TridiagonalOperator> {
    check(size, h)?;
    let mut op = TridiagonalOperator::new(size)?;
    op.set_first_row(-1.0 / h, 1.0 / h);
    op.set_mid_rows(0.0, -1.0 / h, 1.0 / h);
    op.set_last_row(-1.0 / h, 1.0 / h);
    Ok(op)
}

/// Backward difference `D₋`: rows `(−1/h, 1/h, 0)`, first row forward.
pub fn d_minus(size: Size, h: Real) -> Result<TridiagonalOperator> {
    check(size, h)?;
    let mut op = TridiagonalOperator::new(size)?;
    op.set_first_row(-1.0 / h, 1.0 / h);
    op.set_mid_rows(-1.0 / h, 1.0 / h, 0.0);
    op.set_last_row(-1.0 / h, 1.0 / h);
    Ok(op)
}

/// Centred difference `D₀`: rows `(−1/2h, 0, 1/2h)`, one-sided at the edges.
pub fn d_zero(size: Size, h: Real) -> Result<TridiagonalOperator> {
    check(size, h)?;
    let mut op = TridiagonalOperator::new(size)?;
    op.set_first_row(-1.0 / h, 1.0 / h);
    op.set_mid_rows(-0.5 / h, 0.0, 0.5 / h);
    op.set_last_row(-1.0 / h, 1.0 / h);
    Ok(op)
}

/// Second difference `D₊D₋`: rows `(1/h², −2/h², 1/h²)`, zero edge rows.
pub fn d_plus_d_minus(size: Size, h: Real) -> Result<TridiagonalOperator> {
    check(size, h)?;
    let h2 = h * h;
    let mut op = TridiagonalOperator::new(size)?;
    op.set_first_row(0.0, 0.0);
    op.set_mid_rows(1.0 / h2, -2.0 / h2, 1.0 / h2);
    op.set_last_row(0.0, 0.0);
    Ok(op)
}
