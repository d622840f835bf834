//! Chunked parallel sampling on the rayon thread pool.

use rayon::prelude::*;
use tracing::{debug, instrument};

use ql_core::errors::Result;
use ql_core::{ensure_arg, BigNatural, Real, Size};
use ql_math::Statistics;

use super::model::MonteCarloModel;
use super::path_generator::SampleGenerator;
use super::path_pricer::PathPricer;

struct SharedPricer<'a, P>(&'a P);

impl<X, P: PathPricer<X>> PathPricer<X> for SharedPricer<'_, P> {
    fn value(&self, path: &X) -> Real {
        self.0.value(path)
    }
}

/// Seed of chunk `index`, derived from `seed` by a SplitMix64 step.
///
/// A base seed of `0` is passed through as `0` for every chunk, leaving the
/// choice of seeds to the generators.
pub fn chunk_seed(seed: BigNatural, index: Size) -> BigNatural {
    if seed == 0 {
        return 0;
    }
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15_u64.wrapping_mul(index as u64 + 1));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    z.max(1)
}

/// Draw `samples` samples split over `chunks` independent generators.
///
/// Chunk `k` gets `make_generator(chunk_seed(seed, k))` and an equal share
/// of the samples (the first `samples % chunks` chunks draw one extra). The
/// partial accumulators are merged in chunk order, so for a fixed seed the
/// result is the same whatever the size of the thread pool.
#[instrument(level = "debug", skip(make_generator, pricer))]
pub fn parallel_sample_accumulator<G, P, F>(
    samples: Size,
    seed: BigNatural,
    chunks: Size,
    make_generator: F,
    pricer: &P,
) -> Result<Statistics>
where
    G: SampleGenerator,
    P: PathPricer<G::Output>,
    F: Fn(BigNatural) -> Result<G> + Sync,
{
    ensure_arg!(chunks > 0, "at least one chunk required");
    let base = samples / chunks;
    let extra = samples % chunks;
    let partials: Vec<Statistics> = (0..chunks)
        .into_par_iter()
        .map(|k| {
            let n = base + usize::from(k < extra);
            let generator = make_generator(chunk_seed(seed, k))?;
            let mut model = MonteCarloModel::new(generator, SharedPricer(pricer));
            model.add_samples(n)?;
            Ok(model.into_statistics())
        })
        .collect::<Result<Vec<_>>>()?;

    let mut total = Statistics::new();
    for partial in &partials {
        total.merge(partial);
    }
    debug!(samples = total.samples(), "parallel sampling complete");
    Ok(total)
}
