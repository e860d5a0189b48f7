// src/pouch.rs
// The pouch holds the numbers not yet drawn, always in ascending order.

use crate::defs::{FIRSTNUMBER, LASTNUMBER, Number};
use crate::rng::RandomSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pouch {
    numbers: Vec<Number>,
}

impl Pouch {
    pub fn new() -> Self {
        Pouch {
            numbers: (FIRSTNUMBER..=LASTNUMBER).collect(),
        }
    }

    pub fn numbers(&self) -> &[Number] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn contains(&self, number: Number) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    /// Removes a uniformly chosen number, or `None` when the pouch is empty.
    pub fn extract(&mut self, rng: &mut impl RandomSource) -> Option<Number> {
        if self.is_empty() {
            return None;
        }
        let random_index = rng.pick_index(self.len());
        Some(self.numbers.remove(random_index))
    }

    /// Puts a number back, keeping ascending order. Returns false if it was already there.
    pub fn put_back(&mut self, number: Number) -> bool {
        match self.numbers.binary_search(&number) {
            Ok(_) => false,
            Err(position) => {
                self.numbers.insert(position, number);
                true
            }
        }
    }
}

impl Default for Pouch {
    fn default() -> Self {
        Self::new()
    }
}
