//! Inputs of single-asset Black-Scholes options.

use ql_core::errors::Result;
use ql_core::{ensure_arg, DiscountFactor, Rate, Real, Time, Volatility};

use crate::payoff::{OptionType, PlainVanillaPayoff};

/// Contract and market inputs of a single-asset Black-Scholes option.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BsmParameters {
    /// Option type.
    pub option_type: OptionType,
    /// Spot price of the underlying.
    pub underlying: Real,
    /// Strike price.
    pub strike: Real,
    /// Continuous dividend yield.
    pub dividend_yield: Rate,
    /// Continuous risk-free rate.
    pub risk_free_rate: Rate,
    /// Time to expiry in years.
    pub residual_time: Time,
    /// Black-Scholes volatility.
    pub volatility: Volatility,
}

impl BsmParameters {
    /// Bundle the inputs.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        option_type: OptionType,
        underlying: Real,
        strike: Real,
        dividend_yield: Rate,
        risk_free_rate: Rate,
        residual_time: Time,
        volatility: Volatility,
    ) -> Self {
        Self {
            option_type,
            underlying,
            strike,
            dividend_yield,
            risk_free_rate,
            residual_time,
            volatility,
        }
    }

    /// The terminal payoff.
    pub fn payoff(&self) -> PlainVanillaPayoff {
        PlainVanillaPayoff::new(self.option_type, self.strike)
    }

    /// Log drift `r − q − σ²/2` of the underlying.
    pub fn log_drift(&self) -> Real {
        self.risk_free_rate - self.dividend_yield - 0.5 * self.volatility * self.volatility
    }

    /// Discount factor `e^{−rT}` to expiry.
    pub fn discount(&self) -> DiscountFactor {
        (-self.risk_free_rate * self.residual_time).exp()
    }

    /// Positive underlying, strike, residual time and volatility.
    pub fn validate(&self) -> Result<()> {
        ensure_arg!(self.underlying > 0.0, "underlying ({}) must be positive", self.underlying);
        ensure_arg!(self.strike > 0.0, "strike ({}) must be positive", self.strike);
        ensure_arg!(
            self.residual_time > 0.0 && self.residual_time.is_finite(),
            "residual time ({}) must be positive",
            self.residual_time
        );
        ensure_arg!(
            self.volatility > 0.0 && self.volatility.is_finite(),
            "volatility ({}) must be positive",
            self.volatility
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_and_discount() {
        let p = BsmParameters::new(OptionType::Call, 100.0, 90.0, 0.01, 0.05, 2.0, 0.2);
        assert!((p.log_drift() - 0.02).abs() < 1e-15);
        assert!((p.discount() - (-0.1_f64).exp()).abs() < 1e-15);
        assert_eq!(p.payoff().value(120.0), 30.0);
        assert!(p.validate().is_ok());
        assert!(BsmParameters { volatility: 0.0, ..p }.validate().is_err());
    }
}
