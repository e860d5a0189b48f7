// src/session.rs
// The session store: one pouch of remaining numbers and one board of drawn numbers.
// Everything the draw controller commits goes through here, so the two halves
// always partition the full 1..=90 range.

use tracing::error;

use crate::board::Board;
use crate::defs::{FIRSTNUMBER, LASTNUMBER, Number, TOTALNUMBERS};
use crate::pouch::Pouch;
use crate::rng::RandomSource;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pouch: Pouch,
    board: Board,
}

impl Session {
    /// A fresh session: every number in the pouch, nothing drawn.
    pub fn new() -> Self {
        Session {
            pouch: Pouch::new(),
            board: Board::new(),
        }
    }

    pub fn all_numbers() -> impl Iterator<Item = Number> {
        FIRSTNUMBER..=LASTNUMBER
    }

    /// Numbers still in the pouch, ascending.
    pub fn remaining(&self) -> &[Number] {
        self.pouch.numbers()
    }

    /// Drawn numbers, most recent first.
    pub fn drawn(&self) -> Vec<Number> {
        self.board.get_numbers()
    }

    pub fn current(&self) -> Option<Number> {
        self.board.current()
    }

    pub fn drawn_count(&self) -> usize {
        self.board.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.pouch.len()
    }

    pub fn is_drawn(&self, number: Number) -> bool {
        self.board.is_drawn(number)
    }

    pub fn is_exhausted(&self) -> bool {
        self.pouch.is_empty()
    }

    pub fn has_started(&self) -> bool {
        !self.board.is_empty()
    }

    /// Percentage of the 90 numbers already called.
    pub fn progress(&self) -> f64 {
        self.board.len() as f64 / TOTALNUMBERS as f64 * 100.0
    }

    /// Previous calls for the history strip.
    pub fn history(&self, n: usize) -> Vec<Number> {
        self.board.get_last_numbers(n)
    }

    /// Moves one random number from the pouch to the front of the board.
    pub fn draw_with(&mut self, rng: &mut impl RandomSource) -> Option<Number> {
        let extracted = self.pouch.extract(rng)?;
        self.board.push(extracted);
        Some(extracted)
    }

    /// Takes back the most recent call and returns it to the pouch.
    pub fn undo(&mut self) -> Option<Number> {
        let number = self.board.pop()?;
        if !self.pouch.put_back(number) {
            error!(number, "Undone number was already in the pouch");
            debug_assert!(false, "number {number} drawn and in the pouch at once");
        }
        Some(number)
    }

    pub fn reset(&mut self) {
        *self = Session::new();
    }

    /// Checks that pouch and board partition the full range and that the
    /// current call heads the board.
    pub fn check_invariants(&self) -> Result<(), String> {
        let drawn = self.drawn();
        if drawn.len() + self.pouch.len() != TOTALNUMBERS {
            return Err(format!(
                "{} drawn + {} remaining != {TOTALNUMBERS}",
                drawn.len(),
                self.pouch.len()
            ));
        }
        for number in Self::all_numbers() {
            let in_pouch = self.pouch.contains(number);
            let on_board = self.board.is_drawn(number);
            if in_pouch == on_board {
                return Err(format!("number {number} in_pouch={in_pouch} on_board={on_board}"));
            }
        }
        if !self.pouch.numbers().windows(2).all(|w| w[0] < w[1]) {
            return Err("pouch is not in ascending order".to_string());
        }
        if self.current() != drawn.first().copied() {
            return Err("current call is not the most recent draw".to_string());
        }
        Ok(())
    }

    pub fn session_info(&self) -> String {
        format!(
            "Session[drawn={}, remaining={}, current={}]",
            self.drawn_count(),
            self.remaining_count(),
            self.current().map_or_else(|| "none".to_string(), |n| n.to_string())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;
    use proptest::prelude::*;

    #[test]
    fn test_fresh_session() {
        let session = Session::new();
        assert_eq!(session.remaining_count(), 90);
        assert_eq!(session.drawn_count(), 0);
        assert_eq!(session.current(), None);
        assert!(!session.has_started());
        assert!(!session.is_exhausted());
        assert_eq!(session.remaining(), Session::all_numbers().collect::<Vec<_>>());
        assert!(session.check_invariants().is_ok());
    }

    #[test]
    fn test_single_draw() {
        let mut session = Session::new();
        let mut rng = SeededRandom::new(1);
        let drawn = session.draw_with(&mut rng).unwrap();

        assert_eq!(session.drawn(), vec![drawn]);
        assert_eq!(session.current(), Some(drawn));
        assert_eq!(session.remaining_count(), 89);
        assert!(!session.remaining().contains(&drawn));
        assert!(session.check_invariants().is_ok());
    }

    #[test]
    fn test_draw_then_undo_restores_state() {
        let mut session = Session::new();
        let mut rng = SeededRandom::new(2);
        for _ in 0..10 {
            session.draw_with(&mut rng);
        }
        let before = session.clone();

        let drawn = session.draw_with(&mut rng).unwrap();
        assert_eq!(session.undo(), Some(drawn));
        assert_eq!(session, before);
    }

    #[test]
    fn test_undo_on_empty_board_is_noop() {
        let mut session = Session::new();
        assert_eq!(session.undo(), None);
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_ninety_draws_exhaust_the_pouch() {
        let mut session = Session::new();
        let mut rng = SeededRandom::new(3);
        for _ in 0..90 {
            assert!(session.draw_with(&mut rng).is_some());
        }
        assert!(session.is_exhausted());
        assert_eq!(session.progress(), 100.0);

        let before = session.clone();
        assert_eq!(session.draw_with(&mut rng), None);
        assert_eq!(session, before);

        let mut sorted = session.drawn();
        sorted.sort_unstable();
        assert_eq!(sorted, Session::all_numbers().collect::<Vec<_>>());
    }

    #[test]
    fn test_undo_sets_previous_current() {
        let mut session = Session::new();
        let mut rng = SeededRandom::new(4);
        let first = session.draw_with(&mut rng).unwrap();
        session.draw_with(&mut rng).unwrap();
        session.undo();
        assert_eq!(session.current(), Some(first));
        session.undo();
        assert_eq!(session.current(), None);
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut session = Session::new();
        let mut rng = SeededRandom::new(5);
        session.draw_with(&mut rng);
        session.draw_with(&mut rng);
        session.reset();
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_history_and_info() {
        let mut session = Session::new();
        assert!(session.history(11).is_empty());
        assert_eq!(session.session_info(), "Session[drawn=0, remaining=90, current=none]");

        let mut rng = SeededRandom::new(6);
        for _ in 0..15 {
            session.draw_with(&mut rng);
        }
        let drawn = session.drawn();
        assert_eq!(session.history(11), drawn[1..12].to_vec());
        assert!(session.session_info().contains("drawn=15"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "drawn and in the pouch at once")]
    fn test_undo_flags_number_already_in_pouch() {
        let mut session = Session::new();
        let mut rng = SeededRandom::new(7);
        session.draw_with(&mut rng);
        session.pouch = Pouch::new();
        session.undo();
    }

    #[derive(Debug, Clone)]
    enum Op {
        Draw,
        Undo,
        Reset,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => Just(Op::Draw),
            3 => Just(Op::Undo),
            1 => Just(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn prop_pouch_and_board_partition_numbers(
            seed in any::<u64>(),
            ops in proptest::collection::vec(op_strategy(), 0..200),
        ) {
            let mut session = Session::new();
            let mut rng = SeededRandom::new(seed);
            for op in ops {
                match op {
                    Op::Draw => { session.draw_with(&mut rng); }
                    Op::Undo => { session.undo(); }
                    Op::Reset => session.reset(),
                }
                let check = session.check_invariants();
                prop_assert!(check.is_ok(), "{:?}", check);
            }
        }
    }
}
