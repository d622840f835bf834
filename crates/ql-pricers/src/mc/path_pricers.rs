//! Discounted payoffs of single-asset paths.
//!
//! Paths hold log-price increments; the price at node `i` is
//! `S_0 · exp(x_1 + … + x_i)`. With the antithetic flag set, every pricer
//! averages the payoff of the path with that of its mirror.

use ql_core::errors::Result;
use ql_core::{ensure_arg, DiscountFactor, Real};
use ql_methods::{Path, PathPricer};

use crate::payoff::{OptionType, PlainVanillaPayoff};

fn check_inputs(underlying: Real, strike: Real, discount: DiscountFactor) -> Result<()> {
    ensure_arg!(underlying > 0.0, "underlying ({underlying}) must be positive");
    ensure_arg!(strike >= 0.0, "strike ({strike}) must not be negative");
    ensure_arg!(
        discount > 0.0 && discount <= 1.0,
        "discount ({discount}) must lie in (0, 1]"
    );
    Ok(())
}

/// Prices `S_1..S_n` along the increments.
fn prices(underlying: Real, increments: impl Iterator<Item = Real>) -> impl Iterator<Item = Real> {
    increments.scan(underlying.ln(), |log_price, x| {
        *log_price += x;
        Some(log_price.exp())
    })
}

fn arithmetic_average(underlying: Real, increments: impl Iterator<Item = Real>) -> (Real, Real) {
    let (mut sum, mut last, mut n) = (0.0, underlying, 0usize);
    for s in prices(underlying, increments) {
        sum += s;
        last = s;
        n += 1;
    }
    (sum / n.max(1) as Real, last)
}

fn geometric_average(underlying: Real, increments: impl Iterator<Item = Real>) -> (Real, Real) {
    let log_s0 = underlying.ln();
    let (mut log_sum, mut log_price, mut n) = (0.0, log_s0, 0usize);
    for x in increments {
        log_price += x;
        log_sum += log_price;
        n += 1;
    }
    let average = if n == 0 { underlying } else { (log_sum / n as Real).exp() };
    (average, log_price.exp())
}

fn with_antithetic<F: Fn(&mut dyn Iterator<Item = Real>) -> Real>(
    path: &Path,
    antithetic: bool,
    payoff: F,
) -> Real {
    let value = payoff(&mut path.values());
    if antithetic {
        (value + payoff(&mut path.antithetic_values())) / 2.0
    } else {
        value
    }
}

/// European payoff on `S_T = S_0 · exp(Σ x_i)`.
#[derive(Debug, Clone, Copy)]
pub struct EuropeanPathPricer {
    payoff: PlainVanillaPayoff,
    underlying: Real,
    discount: DiscountFactor,
    antithetic: bool,
}

impl EuropeanPathPricer {
    /// Pricer for `payoff` on an underlying starting at `underlying`.
    pub fn new(
        option_type: OptionType,
        underlying: Real,
        strike: Real,
        discount: DiscountFactor,
        antithetic: bool,
    ) -> Result<Self> {
        check_inputs(underlying, strike, discount)?;
        Ok(Self {
            payoff: PlainVanillaPayoff::new(option_type, strike),
            underlying,
            discount,
            antithetic,
        })
    }
}

impl PathPricer<Path> for EuropeanPathPricer {
    fn value(&self, path: &Path) -> Real {
        let price = |total: Real| self.payoff.value(self.underlying * total.exp());
        let mut value = price(path.total());
        if self.antithetic {
            value = (value + price(path.antithetic_total())) / 2.0;
        }
        self.discount * value
    }
}

macro_rules! average_path_pricer {
    ($(#[$meta:meta])* $name:ident, $average:ident, |$payoff:ident, $avg:ident, $last:ident| $value:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name {
            payoff: PlainVanillaPayoff,
            underlying: Real,
            discount: DiscountFactor,
            antithetic: bool,
        }

        impl $name {
            /// Pricer on an underlying starting at `underlying`.
            pub fn new(
                option_type: OptionType,
                underlying: Real,
                strike: Real,
                discount: DiscountFactor,
                antithetic: bool,
            ) -> Result<Self> {
                check_inputs(underlying, strike, discount)?;
                Ok(Self {
                    payoff: PlainVanillaPayoff::new(option_type, strike),
                    underlying,
                    discount,
                    antithetic,
                })
            }
        }

        impl PathPricer<Path> for $name {
            fn value(&self, path: &Path) -> Real {
                let $payoff = &self.payoff;
                let value = with_antithetic(path, self.antithetic, |increments| {
                    let ($avg, $last) = $average(self.underlying, increments);
                    $value
                });
                self.discount * value
            }
        }
    };
}

average_path_pricer!(
    /// Average-price option: the arithmetic mean of `S_1..S_n` against
    /// the strike.
    ArithmeticApoPathPricer,
    arithmetic_average,
    |payoff, average, _last| payoff.value(average)
);

average_path_pricer!(
    /// Average-price option on the geometric mean of `S_1..S_n`.
    GeometricApoPathPricer,
    geometric_average,
    |payoff, average, _last| payoff.value(average)
);

average_path_pricer!(
    /// Average-strike option: `S_T` against the arithmetic mean of
    /// `S_1..S_n`. The strike passed in is ignored.
    ArithmeticAsoPathPricer,
    arithmetic_average,
    |payoff, average, last| payoff.option_type.payoff(last, average)
);

average_path_pricer!(
    /// Average-strike option against the geometric mean of `S_1..S_n`.
    GeometricAsoPathPricer,
    geometric_average,
    |payoff, average, last| payoff.option_type.payoff(last, average)
);

/// Barrier type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BarrierType {
    /// Activated when the price falls to the barrier.
    DownIn,
    /// Cancelled when the price falls to the barrier.
    DownOut,
    /// Activated when the price rises to the barrier.
    UpIn,
    /// Cancelled when the price rises to the barrier.
    UpOut,
}

impl BarrierType {
    fn is_hit(self, price: Real, barrier: Real) -> bool {
        match self {
            BarrierType::DownIn | BarrierType::DownOut => price <= barrier,
            BarrierType::UpIn | BarrierType::UpOut => price >= barrier,
        }
    }

    fn is_knock_in(self) -> bool {
        matches!(self, BarrierType::DownIn | BarrierType::UpIn)
    }
}

/// Discretely monitored barrier option.
///
/// The barrier is checked at `S_0` and at every path node. A knocked-out
/// option, or a knock-in option that was never activated, pays the rebate.
#[derive(Debug, Clone, Copy)]
pub struct BarrierPathPricer {
    barrier_type: BarrierType,
    barrier: Real,
    rebate: Real,
    payoff: PlainVanillaPayoff,
    underlying: Real,
    discount: DiscountFactor,
    antithetic: bool,
}

impl BarrierPathPricer {
    /// Pricer for a barrier option on an underlying starting at `underlying`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        barrier_type: BarrierType,
        barrier: Real,
        rebate: Real,
        option_type: OptionType,
        underlying: Real,
        strike: Real,
        discount: DiscountFactor,
        antithetic: bool,
    ) -> Result<Self> {
        check_inputs(underlying, strike, discount)?;
        ensure_arg!(barrier > 0.0, "barrier ({barrier}) must be positive");
        ensure_arg!(rebate >= 0.0, "rebate ({rebate}) must not be negative");
        Ok(Self {
            barrier_type,
            barrier,
            rebate,
            payoff: PlainVanillaPayoff::new(option_type, strike),
            underlying,
            discount,
            antithetic,
        })
    }

    fn payoff_on(&self, increments: &mut dyn Iterator<Item = Real>) -> Real {
        let mut hit = self.barrier_type.is_hit(self.underlying, self.barrier);
        let mut last = self.underlying;
        for s in prices(self.underlying, increments) {
            hit |= self.barrier_type.is_hit(s, self.barrier);
            last = s;
        }
        if hit == self.barrier_type.is_knock_in() {
            self.payoff.value(last)
        } else {
            self.rebate
        }
    }
}

impl PathPricer<Path> for BarrierPathPricer {
    fn value(&self, path: &Path) -> Real {
        self.discount * with_antithetic(path, self.antithetic, |increments| self.payoff_on(increments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ql_math::Array;
    use ql_methods::TimeGrid;
    use std::sync::Arc;

    fn path(increments: &[Real]) -> Path {
        let n = increments.len();
        let grid = Arc::new(TimeGrid::uniform(n as Real, n).unwrap());
        Path::new(grid, Array::zeros(n), Array::from_slice(increments)).unwrap()
    }

    #[test]
    fn european_on_terminal_price() {
        let p = EuropeanPathPricer::new(OptionType::Call, 100.0, 100.0, 0.9, false).unwrap();
        let up = path(&[0.1, 0.1]);
        assert_relative_eq!(p.value(&up), 0.9 * (100.0 * 0.2_f64.exp() - 100.0), epsilon = 1e-12);
        let anti = EuropeanPathPricer::new(OptionType::Call, 100.0, 100.0, 0.9, true).unwrap();
        // the mirror path ends out of the money
        assert_relative_eq!(anti.value(&up), p.value(&up) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn averages() {
        let steps = path(&[2.0_f64.ln(), 2.0_f64.ln()]);
        let apo = ArithmeticApoPathPricer::new(OptionType::Call, 1.0, 2.0, 1.0, false).unwrap();
        assert_relative_eq!(apo.value(&steps), 1.0, epsilon = 1e-12); // (2 + 4)/2 − 2
        let gapo = GeometricApoPathPricer::new(OptionType::Call, 1.0, 2.0, 1.0, false).unwrap();
        assert_relative_eq!(gapo.value(&steps), 8.0_f64.sqrt() - 2.0, epsilon = 1e-12);
        let aso = ArithmeticAsoPathPricer::new(OptionType::Call, 1.0, 0.0, 1.0, false).unwrap();
        assert_relative_eq!(aso.value(&steps), 1.0, epsilon = 1e-12); // 4 − 3
        let gaso = GeometricAsoPathPricer::new(OptionType::Put, 1.0, 0.0, 1.0, false).unwrap();
        assert_eq!(gaso.value(&steps), 0.0);
    }

    #[test]
    fn barrier_monitoring() {
        let dip = path(&[-0.3, 0.4]);
        let out = |t| BarrierPathPricer::new(t, 80.0, 1.5, OptionType::Call, 100.0, 100.0, 1.0, false).unwrap();
        let payoff = 100.0 * 0.1_f64.exp() - 100.0;
        assert_eq!(out(BarrierType::DownOut).value(&dip), 1.5);
        assert_relative_eq!(out(BarrierType::DownIn).value(&dip), payoff, epsilon = 1e-12);
        let flat = path(&[0.05, 0.05]);
        assert_relative_eq!(out(BarrierType::DownOut).value(&flat), payoff, epsilon = 1e-12);
        assert_eq!(out(BarrierType::DownIn).value(&flat), 1.5);
        // starting on the barrier counts as a hit
        let up = BarrierPathPricer::new(BarrierType::UpOut, 100.0, 0.0, OptionType::Call, 100.0, 90.0, 1.0, false).unwrap();
        assert_eq!(up.value(&flat), 0.0);
    }
}
