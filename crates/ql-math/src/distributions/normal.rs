//! The standard normal distribution.
//!
//! The cumulative function goes through `statrs`' complementary error
//! function; the inverse uses Acklam's rational approximation polished by a
//! single Halley step, which brings it to near machine precision.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use ql_core::errors::Result;
use ql_core::{ensure, Real};
use statrs::function::erf::erfc;

/// Standard normal density `exp(-x²/2)/√(2π)`.
#[inline]
pub fn normal_pdf(x: Real) -> Real {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Standard normal cumulative distribution `Φ(x)`.
#[inline]
pub fn normal_cdf(x: Real) -> Real {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// Inverse of [`normal_cdf`], defined on the open interval `(0, 1)`.
pub fn normal_cdf_inverse(p: Real) -> Result<Real> {
    ensure!(p > 0.0 && p < 1.0, "probability ({p}) must be in (0, 1)");
    Ok(inverse_on_open_unit_interval(p))
}

/// [`normal_cdf_inverse`] without the domain check; `p` must lie in `(0, 1)`.
pub(crate) fn inverse_on_open_unit_interval(p: Real) -> Real {
    let x = acklam(p);
    // Halley refinement on f(x) = Φ(x) - p
    let e = normal_cdf(x) - p;
    let u = e * (2.0 * PI).sqrt() * (0.5 * x * x).exp();
    x - u / (1.0 + 0.5 * x * u)
}

fn acklam(p: Real) -> Real {
    const A: [Real; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_690e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239e0,
    ];
    const B: [Real; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [Real; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838e0,
        -2.549_732_539_343_734e0,
        4.374_664_141_464_968e0,
        2.938_163_982_698_783e0,
    ];
    const D: [Real; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996e0,
        3.754_408_661_907_416e0,
    ];
    const P_LOW: Real = 0.02425;

    let tail = |q: Real| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p > 1.0 - P_LOW {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    } else {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert!((normal_pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-15);
        assert_eq!(normal_cdf(0.0), 0.5);
        assert!((normal_cdf(1.96) - 0.975_002_104_851_780).abs() < 1e-13);
        assert!((normal_cdf(-1.0) - 0.158_655_253_931_457_05).abs() < 1e-13);
        assert!(normal_cdf(-10.0) < 1e-20);
    }

    #[test]
    fn inverse_round_trip() {
        for p in [1e-10, 1e-4, 0.01, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99, 1.0 - 1e-7] {
            let x = normal_cdf_inverse(p).unwrap();
            let back = normal_cdf(x);
            assert!((back - p).abs() <= 1e-12 * p.max(1e-3), "p = {p}: got {back}");
        }
    }

    #[test]
    fn inverse_rejects_closed_interval() {
        assert!(normal_cdf_inverse(0.0).is_err());
        assert!(normal_cdf_inverse(1.0).is_err());
        assert!(normal_cdf_inverse(f64::NAN).is_err());
    }
}
