//! Monte Carlo simulation framework.
//!
//! # Overview
//!
//! * [`TimeGrid`]: simulation dates
//! * [`Path`], [`MultiPath`]: sampled log-price increments, kept as
//!   separate drift and diffusion so antithetic paths come for free
//! * [`PathGenerator`], [`MultiPathGenerator`]: Gaussian path generation
//! * [`PathPricer`]: discounted payoff of a path
//! * [`MonteCarloModel`]: sequential sample accumulation
//! * [`parallel_sample_accumulator`]: deterministic chunked sampling on rayon

mod model;
mod multi_path_generator;
mod parallel;
mod path;
mod path_generator;
mod path_pricer;
mod time_grid;

pub use model::MonteCarloModel;
pub use multi_path_generator::MultiPathGenerator;
pub use parallel::{chunk_seed, parallel_sample_accumulator};
pub use path::{MultiPath, Path};
pub use path_generator::{PathGenerator, SampleGenerator, StandardPathGenerator};
pub use path_pricer::{ControlVariatedPathPricer, PathPricer};
pub use time_grid::TimeGrid;
