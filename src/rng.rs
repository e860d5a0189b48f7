// src/rng.rs
// Random sources used to pick drawn numbers and the decoys shown while rolling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::defs::{FIRSTNUMBER, Number, TOTALNUMBERS};

/// Source of uniform random choices for the draw engine.
pub trait RandomSource {
    /// Returns an index uniformly distributed in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// A cosmetic number shown while a draw is rolling.
    fn decoy(&mut self) -> Number {
        FIRSTNUMBER + self.pick_index(TOTALNUMBERS) as Number
    }
}

/// Thread-local generator, used for real games.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Seeded generator, so a whole session can be replayed.
#[derive(Debug, Clone)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Either of the production sources, chosen at startup from the command line.
#[derive(Debug, Clone)]
pub enum AnyRandom {
    Thread(ThreadRandom),
    Seeded(SeededRandom),
}

impl AnyRandom {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => AnyRandom::Seeded(SeededRandom::new(seed)),
            None => AnyRandom::Thread(ThreadRandom),
        }
    }
}

impl RandomSource for AnyRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        match self {
            AnyRandom::Thread(rng) => rng.pick_index(len),
            AnyRandom::Seeded(rng) => rng.pick_index(len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::LASTNUMBER;

    #[test]
    fn test_seeded_random_is_reproducible() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        let first: Vec<usize> = (0..20).map(|_| a.pick_index(90)).collect();
        let second: Vec<usize> = (0..20).map(|_| b.pick_index(90)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pick_index_stays_in_range() {
        let mut rng = ThreadRandom;
        for len in 1..=90 {
            assert!(rng.pick_index(len) < len);
        }
    }

    #[test]
    fn test_decoy_is_a_board_number() {
        let mut rng = AnyRandom::from_seed(Some(7));
        for _ in 0..500 {
            let decoy = rng.decoy();
            assert!((FIRSTNUMBER..=LASTNUMBER).contains(&decoy));
        }
    }
}
