//! Discounted payoffs of multi-asset paths.

use ql_core::errors::Result;
use ql_core::{ensure_arg, DiscountFactor, Real};
use ql_math::Array;
use ql_methods::{MultiPath, Path, PathPricer};

use crate::payoff::{OptionType, PlainVanillaPayoff};

fn check_discount(discount: DiscountFactor) -> Result<()> {
    ensure_arg!(
        discount > 0.0 && discount <= 1.0,
        "discount ({discount}) must lie in (0, 1]"
    );
    Ok(())
}

fn check_underlyings(underlyings: &Array) -> Result<()> {
    ensure_arg!(!underlyings.is_empty(), "no underlyings given");
    ensure_arg!(
        underlyings.iter().all(|s| *s > 0.0),
        "underlyings must be positive: {underlyings}"
    );
    Ok(())
}

fn increment(path: &Path, i: usize, antithetic: bool) -> Real {
    if antithetic {
        path.antithetic(i)
    } else {
        path.value(i)
    }
}

fn total(path: &Path, antithetic: bool) -> Real {
    if antithetic {
        path.antithetic_total()
    } else {
        path.total()
    }
}

fn with_antithetic<F: Fn(bool) -> Real>(antithetic: bool, payoff: F) -> Real {
    if antithetic {
        (payoff(false) + payoff(true)) / 2.0
    } else {
        payoff(false)
    }
}

/// How a basket collapses its final prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BasketType {
    /// Worst-of: the lowest final price.
    MinBasket,
    /// Best-of: the highest final price.
    MaxBasket,
}

/// Option on the lowest or highest final asset price.
#[derive(Debug, Clone)]
pub struct BasketPathPricer {
    basket_type: BasketType,
    payoff: PlainVanillaPayoff,
    underlyings: Array,
    discount: DiscountFactor,
    antithetic: bool,
}

impl BasketPathPricer {
    /// Pricer on assets starting at `underlyings`.
    pub fn new(
        basket_type: BasketType,
        option_type: OptionType,
        underlyings: Array,
        strike: Real,
        discount: DiscountFactor,
        antithetic: bool,
    ) -> Result<Self> {
        check_underlyings(&underlyings)?;
        check_discount(discount)?;
        ensure_arg!(strike >= 0.0, "strike ({strike}) must not be negative");
        Ok(Self {
            basket_type,
            payoff: PlainVanillaPayoff::new(option_type, strike),
            underlyings,
            discount,
            antithetic,
        })
    }
}

impl PathPricer<MultiPath> for BasketPathPricer {
    fn value(&self, paths: &MultiPath) -> Real {
        let value = with_antithetic(self.antithetic, |anti| {
            let finals = paths
                .iter()
                .zip(self.underlyings.iter())
                .map(|(p, s0)| s0 * total(p, anti).exp());
            let basket = match self.basket_type {
                BasketType::MinBasket => finals.fold(Real::INFINITY, Real::min),
                BasketType::MaxBasket => finals.fold(Real::NEG_INFINITY, Real::max),
            };
            self.payoff.value(basket)
        });
        self.discount * value
    }
}

/// Everest option: pays the worst relative performance `min_j S_j(T)/S_j(0)`.
#[derive(Debug, Clone, Copy)]
pub struct EverestPathPricer {
    discount: DiscountFactor,
    antithetic: bool,
}

impl EverestPathPricer {
    /// Pricer discounting with `discount`.
    pub fn new(discount: DiscountFactor, antithetic: bool) -> Result<Self> {
        check_discount(discount)?;
        Ok(Self {
            discount,
            antithetic,
        })
    }
}

impl PathPricer<MultiPath> for EverestPathPricer {
    fn value(&self, paths: &MultiPath) -> Real {
        let value = with_antithetic(self.antithetic, |anti| {
            paths
                .iter()
                .map(|p| total(p, anti).exp())
                .fold(Real::INFINITY, Real::min)
        });
        self.discount * value
    }
}

/// Himalaya option.
///
/// At each fixing the best performer among the remaining assets is removed
/// and its price added to the average; there are as many fixings as steps,
/// up to the number of assets. Pays `max(average − K, 0)`.
#[derive(Debug, Clone)]
pub struct HimalayaPathPricer {
    underlyings: Array,
    strike: Real,
    discount: DiscountFactor,
    antithetic: bool,
}

impl HimalayaPathPricer {
    /// Pricer on assets starting at `underlyings`.
    pub fn new(
        underlyings: Array,
        strike: Real,
        discount: DiscountFactor,
        antithetic: bool,
    ) -> Result<Self> {
        check_underlyings(&underlyings)?;
        check_discount(discount)?;
        ensure_arg!(strike >= 0.0, "strike ({strike}) must not be negative");
        Ok(Self {
            underlyings,
            strike,
            discount,
            antithetic,
        })
    }

    fn payoff(&self, paths: &MultiPath, anti: bool) -> Real {
        let assets = paths.asset_number().min(self.underlyings.size());
        let fixings = paths.path_size().min(assets);
        if fixings == 0 {
            return 0.0;
        }
        let mut prices = self.underlyings.clone();
        let mut remaining = vec![true; assets];
        let mut average = 0.0;
        for i in 0..fixings {
            let mut best: Option<(usize, Real)> = None;
            for j in (0..assets).filter(|&j| remaining[j]) {
                prices[j] *= increment(&paths[j], i, anti).exp();
                if best.map_or(true, |(_, b)| prices[j] >= b) {
                    best = Some((j, prices[j]));
                }
            }
            if let Some((j, price)) = best {
                remaining[j] = false;
                average += price;
            }
        }
        (average / fixings as Real - self.strike).max(0.0)
    }
}

impl PathPricer<MultiPath> for HimalayaPathPricer {
    fn value(&self, paths: &MultiPath) -> Real {
        self.discount * with_antithetic(self.antithetic, |anti| self.payoff(paths, anti))
    }
}

/// Pagoda option: a capped, floored share of the weighted sum of the
/// per-step returns `Σ_i Σ_j w_j (e^{x_ij} − 1)`, averaged over assets.
#[derive(Debug, Clone)]
pub struct PagodaPathPricer {
    weights: Array,
    fraction: Real,
    roof: Real,
    discount: DiscountFactor,
    antithetic: bool,
}

impl PagodaPathPricer {
    /// Pays `fraction · max(0, min(roof, average return))`.
    pub fn new(
        weights: Array,
        fraction: Real,
        roof: Real,
        discount: DiscountFactor,
        antithetic: bool,
    ) -> Result<Self> {
        ensure_arg!(!weights.is_empty(), "no weights given");
        ensure_arg!(fraction >= 0.0, "fraction ({fraction}) must not be negative");
        ensure_arg!(roof >= 0.0, "roof ({roof}) must not be negative");
        check_discount(discount)?;
        Ok(Self {
            weights,
            fraction,
            roof,
            discount,
            antithetic,
        })
    }
}

impl PathPricer<MultiPath> for PagodaPathPricer {
    fn value(&self, paths: &MultiPath) -> Real {
        let assets = paths.asset_number().max(1) as Real;
        let value = with_antithetic(self.antithetic, |anti| {
            let sum: Real = paths
                .iter()
                .zip(self.weights.iter())
                .map(|(p, w)| {
                    (0..p.len())
                        .map(|i| w * (increment(p, i, anti).exp() - 1.0))
                        .sum::<Real>()
                })
                .sum();
            (sum / assets).min(self.roof).max(0.0)
        });
        self.discount * self.fraction * value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ql_methods::TimeGrid;
    use std::sync::Arc;

    fn multi(increments: &[&[Real]]) -> MultiPath {
        let n = increments[0].len();
        let grid = Arc::new(TimeGrid::uniform(n as Real, n).unwrap());
        let paths = increments
            .iter()
            .map(|x| Path::new(grid.clone(), Array::zeros(n), Array::from_slice(x)).unwrap())
            .collect();
        MultiPath::new(paths).unwrap()
    }

    #[test]
    fn baskets() {
        let ln2 = 2.0_f64.ln();
        let p = multi(&[&[ln2], &[0.0]]);
        let s0 = Array::from_slice(&[10.0, 15.0]);
        let max = BasketPathPricer::new(BasketType::MaxBasket, OptionType::Call, s0.clone(), 12.0, 1.0, false)
            .unwrap();
        assert_relative_eq!(max.value(&p), 8.0, epsilon = 1e-12);
        let min = BasketPathPricer::new(BasketType::MinBasket, OptionType::Put, s0, 20.0, 1.0, false).unwrap();
        assert_relative_eq!(min.value(&p), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn everest_takes_the_worst_performer() {
        let p = multi(&[&[0.1, 0.1], &[-0.2, 0.05]]);
        let e = EverestPathPricer::new(0.5, false).unwrap();
        assert_relative_eq!(e.value(&p), 0.5 * (-0.15_f64).exp(), epsilon = 1e-12);
        let anti = EverestPathPricer::new(0.5, true).unwrap();
        let mirrored = 0.5 * (-0.2_f64).exp();
        assert_relative_eq!(anti.value(&p), (e.value(&p) + mirrored) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn himalaya_removes_best_performers() {
        let ln2 = 2.0_f64.ln();
        // fixing 1: prices 2, 1, 1 -> asset 0 removed at 2
        // fixing 2: prices 2, 1 -> asset 1 removed at 2
        let p = multi(&[&[ln2, 0.0], &[0.0, ln2], &[0.0, 0.0]]);
        let h = HimalayaPathPricer::new(Array::from_element(3, 1.0), 1.0, 1.0, false).unwrap();
        assert_relative_eq!(h.value(&p), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn pagoda_is_capped() {
        let p = multi(&[&[0.1, 0.1], &[0.1, 0.1]]);
        let ret = 0.1_f64.exp() - 1.0;
        let weights = Array::from_element(2, 1.0);
        let open = PagodaPathPricer::new(weights.clone(), 0.5, 1.0, 1.0, false).unwrap();
        assert_relative_eq!(open.value(&p), 0.5 * 2.0 * ret, epsilon = 1e-12);
        let capped = PagodaPathPricer::new(weights, 0.5, 0.1, 1.0, false).unwrap();
        assert_relative_eq!(capped.value(&p), 0.05, epsilon = 1e-12);
    }
}
