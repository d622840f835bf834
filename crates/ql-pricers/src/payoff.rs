//! Option payoffs.

use std::fmt;

use ql_core::Real;

/// Option type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Right to buy.
    Call,
    /// Right to sell.
    Put,
    /// Call plus put at the same strike.
    Straddle,
}

impl OptionType {
    /// Exercise value of the option at `price` against `strike`.
    pub fn payoff(self, price: Real, strike: Real) -> Real {
        match self {
            OptionType::Call => (price - strike).max(0.0),
            OptionType::Put => (strike - price).max(0.0),
            OptionType::Straddle => (price - strike).abs(),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
            OptionType::Straddle => write!(f, "Straddle"),
        }
    }
}

/// Plain vanilla payoff `max(φ(S − K), 0)`, or `|S − K|` for a straddle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlainVanillaPayoff {
    /// Option type.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Real,
}

impl PlainVanillaPayoff {
    /// Create a new plain vanilla payoff.
    pub fn new(option_type: OptionType, strike: Real) -> Self {
        Self {
            option_type,
            strike,
        }
    }

    /// Payoff at `price`.
    pub fn value(&self, price: Real) -> Real {
        self.option_type.payoff(price, self.strike)
    }
}

impl fmt::Display for PlainVanillaPayoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vanilla {} @ {}", self.option_type, self.strike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanilla_payoffs() {
        assert_eq!(OptionType::Call.payoff(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.payoff(110.0, 100.0), 0.0);
        assert_eq!(OptionType::Straddle.payoff(90.0, 100.0), 10.0);
        let p = PlainVanillaPayoff::new(OptionType::Put, 100.0);
        assert_eq!(p.value(75.0), 25.0);
        assert_eq!(p.to_string(), "Vanilla Put @ 100");
    }
}
