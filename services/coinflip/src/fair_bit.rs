//! Uniform random bits for guesses and the classical coin

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use shared::Bit;

pub trait BitSource {
    fn next_bit(&mut self) -> Bit;
}

/// Closures work as scripted sources in tests and demos
impl<F> BitSource for F
where
    F: FnMut() -> Bit,
{
    fn next_bit(&mut self) -> Bit {
        self()
    }
}

pub struct FairBitSource<R: RngCore = StdRng> {
    rng: R,
}

impl FairBitSource<StdRng> {
    /// Seeded when `seed` is given, otherwise drawn from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl<R: RngCore> FairBitSource<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> BitSource for FairBitSource<R> {
    fn next_bit(&mut self) -> Bit {
        Bit::from(self.rng.gen_bool(0.5))
    }
}
