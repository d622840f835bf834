//! Closed-form control values.

use ql_core::errors::Result;
use ql_core::{ensure_arg, DiscountFactor, Real, Time};
use ql_math::normal_cdf;

use crate::parameters::BsmParameters;
use crate::payoff::OptionType;

/// Black formula on a lognormal forward with total standard deviation
/// `std_dev`.
fn black(
    option_type: OptionType,
    forward: Real,
    strike: Real,
    std_dev: Real,
    discount: DiscountFactor,
) -> Real {
    if std_dev <= 0.0 {
        return discount * option_type.payoff(forward, strike);
    }
    let d1 = (forward / strike).ln() / std_dev + 0.5 * std_dev;
    let d2 = d1 - std_dev;
    let call = forward * normal_cdf(d1) - strike * normal_cdf(d2);
    let put = strike * normal_cdf(-d2) - forward * normal_cdf(-d1);
    discount
        * match option_type {
            OptionType::Call => call,
            OptionType::Put => put,
            OptionType::Straddle => call + put,
        }
}

/// Price of the discrete geometric average-price option fixing at
/// `fixing_times`, paid at the residual time.
///
/// The geometric mean of lognormal fixings is itself lognormal, with log
/// variance `σ²/n² · Σ_i Σ_j min(t_i, t_j)`.
pub fn discrete_geometric_apo_value(params: &BsmParameters, fixing_times: &[Time]) -> Result<Real> {
    params.validate()?;
    ensure_arg!(!fixing_times.is_empty(), "no fixing times given");
    ensure_arg!(
        fixing_times.iter().all(|&t| t > 0.0 && t <= params.residual_time),
        "fixing times must lie in (0, {}]",
        params.residual_time
    );
    let n = fixing_times.len() as Real;
    let mean_time = fixing_times.iter().sum::<Time>() / n;
    let min_sum: Time = fixing_times
        .iter()
        .map(|&ti| fixing_times.iter().map(|&tj| ti.min(tj)).sum::<Time>())
        .sum();
    let variance = params.volatility * params.volatility * min_sum / (n * n);
    let log_mean = params.underlying.ln() + params.log_drift() * mean_time;
    let forward = (log_mean + 0.5 * variance).exp();
    Ok(black(
        params.option_type,
        forward,
        params.strike,
        variance.sqrt(),
        params.discount(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_fixing_at_expiry_is_black_scholes() {
        let params = BsmParameters::new(OptionType::Call, 100.0, 100.0, 0.0, 0.05, 1.0, 0.2);
        // Black-Scholes at-the-money reference value
        assert_relative_eq!(
            discrete_geometric_apo_value(&params, &[1.0]).unwrap(),
            10.450_583_572_185_565,
            epsilon = 1e-6
        );
    }

    #[test]
    fn averaging_cheapens_the_option() {
        let params = BsmParameters::new(OptionType::Call, 100.0, 100.0, 0.0, 0.05, 1.0, 0.2);
        let times: Vec<Time> = (1..=12).map(|i| i as Time / 12.0).collect();
        let asian = discrete_geometric_apo_value(&params, &times).unwrap();
        assert!(asian > 4.0 && asian < 10.0);
        assert!(discrete_geometric_apo_value(&params, &[]).is_err());
        assert!(discrete_geometric_apo_value(&params, &[2.0]).is_err());
    }
}
