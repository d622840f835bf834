//! Monte Carlo pricers.
//!
//! # Overview
//!
//! * [`McPricer`]: draws samples until a tolerance or sample count is met
//! * single-asset path pricers: European, average price and average strike,
//!   barrier
//! * multi-asset path pricers: basket, Everest, Himalaya, Pagoda
//! * ready-made pricers wiring a Black-Scholes path generator to each

mod analytic;
mod mc_pricer;
mod multi_path_pricers;
mod path_pricers;
mod pricers;

pub use analytic::discrete_geometric_apo_value;
pub use mc_pricer::McPricer;
pub use multi_path_pricers::{
    BasketPathPricer, BasketType, EverestPathPricer, HimalayaPathPricer, PagodaPathPricer,
};
pub use path_pricers::{
    ArithmeticApoPathPricer, ArithmeticAsoPathPricer, BarrierPathPricer, BarrierType,
    EuropeanPathPricer, GeometricApoPathPricer, GeometricAsoPathPricer,
};
pub use pricers::{
    ApoPathPricer, McBarrier, McBasket, McDiscreteArithmeticApo, McDiscreteArithmeticAso,
    McEuropean, McEverest, McHimalaya, McPagoda, MultiAssetMarket, StandardMultiPathGenerator,
};
