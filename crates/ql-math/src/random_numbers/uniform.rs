use ql_core::{BigNatural, Real};
use rand_mt::Mt19937GenRand64;

use super::{os_seed, RandomNumberGenerator, Sample, SeedableGenerator};

const M: i64 = 2_147_483_647;
const A: i64 = 16_807;
const Q: i64 = 127_773;
const R: i64 = 2_836;
const TABLE_SIZE: usize = 32;
const TABLE_DIVISOR: i64 = 1 + (M - 1) / TABLE_SIZE as i64;
const MAX_RANDOM: Real = 1.0 - Real::EPSILON;

/// Park-Miller "minimal standard" generator with a Bays-Durham shuffle.
///
/// The multiplicative congruence `x ← 16807·x mod (2³¹−1)` is evaluated
/// with Schrage's factorisation so that no intermediate overflows 32 bits.
/// The shuffle table breaks up the low-order serial correlations of the
/// bare congruence.
#[derive(Debug, Clone)]
pub struct MinimalStandardRng {
    state: i64,
    last: i64,
    table: [i64; TABLE_SIZE],
}

impl MinimalStandardRng {
    /// Build from a seed; `0` draws a seed from the operating system.
    pub fn new(seed: BigNatural) -> Self {
        let seed = if seed == 0 { os_seed() } else { seed };
        let mut state = (seed % M as u64) as i64;
        if state == 0 {
            state = 1;
        }
        let mut table = [0_i64; TABLE_SIZE];
        // warm up eight rounds before filling the table
        for j in (0..TABLE_SIZE + 8).rev() {
            state = Self::advance(state);
            if j < TABLE_SIZE {
                table[j] = state;
            }
        }
        Self {
            state,
            last: table[0],
            table,
        }
    }

    fn advance(x: i64) -> i64 {
        let k = x / Q;
        let next = A * (x - k * Q) - R * k;
        if next < 0 {
            next + M
        } else {
            next
        }
    }
}

impl SeedableGenerator for MinimalStandardRng {
    fn with_seed(seed: BigNatural) -> Self {
        Self::new(seed)
    }
}

impl RandomNumberGenerator for MinimalStandardRng {
    fn next(&mut self) -> Sample<Real> {
        self.state = Self::advance(self.state);
        let j = (self.last / TABLE_DIVISOR) as usize;
        self.last = self.table[j];
        self.table[j] = self.state;
        let u = (self.last as Real / M as Real).min(MAX_RANDOM);
        Sample::new(u, 1.0)
    }
}

/// Uniform generator on the 64-bit Mersenne Twister (MT19937-64).
#[derive(Debug, Clone)]
pub struct MersenneTwisterUniformRng {
    rng: Mt19937GenRand64,
}

impl MersenneTwisterUniformRng {
    /// Build from a seed; `0` draws a seed from the operating system.
    pub fn new(seed: BigNatural) -> Self {
        let seed = if seed == 0 { os_seed() } else { seed };
        Self {
            rng: Mt19937GenRand64::new(seed),
        }
    }

    /// The next raw 64-bit output.
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

impl SeedableGenerator for MersenneTwisterUniformRng {
    fn with_seed(seed: BigNatural) -> Self {
        Self::new(seed)
    }
}

impl RandomNumberGenerator for MersenneTwisterUniformRng {
    fn next(&mut self) -> Sample<Real> {
        // top 53 bits, shifted half a unit off zero
        let bits = self.rng.next_u64() >> 11;
        let u = (bits as Real + 0.5) / (1u64 << 53) as Real;
        Sample::new(u, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_standard_is_deterministic_and_open() {
        let mut a = MinimalStandardRng::new(42);
        let mut b = MinimalStandardRng::new(42);
        for _ in 0..10_000 {
            let x = a.next();
            assert_eq!(x, b.next());
            assert!(x.value > 0.0 && x.value < 1.0);
            assert_eq!(x.weight, 1.0);
        }
    }

    #[test]
    fn minimal_standard_congruence() {
        // Park and Miller's check value: x_10000 = 1043618065 from x_0 = 1.
        let mut x = 1;
        for _ in 0..10_000 {
            x = MinimalStandardRng::advance(x);
        }
        assert_eq!(x, 1_043_618_065);
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = MinimalStandardRng::new(1);
        let mut b = MinimalStandardRng::new(2);
        let same = (0..100).filter(|_| a.next_real() == b.next_real()).count();
        assert!(same < 5);
    }

    #[test]
    fn mersenne_twister_in_open_interval() {
        let mut rng = MersenneTwisterUniformRng::new(42);
        let mut sum = 0.0;
        for _ in 0..10_000 {
            let u = rng.next_real();
            assert!(u > 0.0 && u < 1.0);
            sum += u;
        }
        assert!((sum / 10_000.0 - 0.5).abs() < 0.02);
    }
}
