// src/board.rs
// The board records the drawn numbers, most recent call first.

use std::collections::VecDeque;

use crate::defs::{FIRSTNUMBER, LASTNUMBER, Number, TOTALNUMBERS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    drawn: VecDeque<Number>,
    // Membership flags indexed by number - FIRSTNUMBER
    marked: [bool; TOTALNUMBERS],
}

impl Board {
    pub fn new() -> Self {
        Board {
            drawn: VecDeque::with_capacity(TOTALNUMBERS),
            marked: [false; TOTALNUMBERS],
        }
    }

    /// Records a new call in front of the previous ones.
    pub fn push(&mut self, number: Number) {
        debug_assert!((FIRSTNUMBER..=LASTNUMBER).contains(&number));
        self.drawn.push_front(number);
        self.marked[slot(number)] = true;
    }

    /// Removes the most recent call.
    pub fn pop(&mut self) -> Option<Number> {
        let number = self.drawn.pop_front()?;
        self.marked[slot(number)] = false;
        Some(number)
    }

    pub fn current(&self) -> Option<Number> {
        self.drawn.front().copied()
    }

    pub fn len(&self) -> usize {
        self.drawn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty()
    }

    pub fn is_drawn(&self, number: Number) -> bool {
        (FIRSTNUMBER..=LASTNUMBER).contains(&number) && self.marked[slot(number)]
    }

    /// All drawn numbers, most recent first.
    pub fn get_numbers(&self) -> Vec<Number> {
        self.drawn.iter().copied().collect()
    }

    /// The calls before the current one, most recent first, at most `n` of them.
    pub fn get_last_numbers(&self, n: usize) -> Vec<Number> {
        self.drawn.iter().skip(1).take(n).copied().collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn slot(number: Number) -> usize {
    (number - FIRSTNUMBER) as usize
}
