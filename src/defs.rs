// src/defs.rs
// Shared definitions for the bingo caller: the number domain, the master board layout
// and the default animation timings.

use std::time::Duration;

pub type Number = u8;

pub struct BoardStruct {
    pub cols_per_card: u8,
    pub rows_per_card: u8,
    pub cards_per_row: u8,
    pub cards_per_col: u8,
    pub hnumbers_space: u8,
    pub vnumbers_space: u8,
    pub hcards_space: u8,
    pub vcards_space: u8,
}

pub const BOARDCONFIG: BoardStruct = BoardStruct {
    cols_per_card: 5, // number of columns in a card
    rows_per_card: 3, // number of rows in a card
    cards_per_row: 2, // number of cards in a row
    cards_per_col: 3, // number of cards in a column
    hnumbers_space: 1, // space between numbers in the same row
    vnumbers_space: 0, // blank lines between numbers in the same column
    hcards_space: 3, // space between cards in the same row
    vcards_space: 1, // blank lines between cards in the same column
};

pub const FIRSTNUMBER: Number = 1;
pub const LASTNUMBER: Number = BOARDCONFIG.cols_per_card
    * BOARDCONFIG.rows_per_card
    * BOARDCONFIG.cards_per_row
    * BOARDCONFIG.cards_per_col
    - 1
    + FIRSTNUMBER;
pub const TOTALNUMBERS: usize = (LASTNUMBER - FIRSTNUMBER + 1) as usize;
pub const NUMBERSPERROW: u8 = BOARDCONFIG.cols_per_card * BOARDCONFIG.cards_per_row;

pub const DEFAULT_TITLE: &str = "Pallion Action Group BINGO!";

// Animation timings
pub const ROLL_DURATION: Duration = Duration::from_millis(300);
pub const ROLL_INTERVAL: Duration = Duration::from_millis(40);
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(400);
pub const NOTICE_DURATION: Duration = Duration::from_millis(2500);

// Number of previous calls shown in the history strip
pub const HISTORY_LEN: usize = 11;

/// Durations driving the rolling animation and the post-draw highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub roll_duration: Duration,
    pub roll_interval: Duration,
    pub highlight: Duration,
}

impl Timing {
    /// Number of decoy ticks before a draw commits; the last tick commits.
    pub fn roll_steps(&self) -> u32 {
        let interval = self.roll_interval.as_millis().max(1);
        let steps = self.roll_duration.as_millis().div_ceil(interval);
        steps.clamp(1, u32::MAX as u128) as u32
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            roll_duration: ROLL_DURATION,
            roll_interval: ROLL_INTERVAL,
            highlight: HIGHLIGHT_DURATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_domain() {
        assert_eq!(FIRSTNUMBER, 1);
        assert_eq!(LASTNUMBER, 90);
        assert_eq!(TOTALNUMBERS, 90);
        assert_eq!(NUMBERSPERROW, 10);
    }

    #[test]
    fn test_default_roll_steps() {
        // 300ms at 40ms per tick rounds up to 8 ticks
        assert_eq!(Timing::default().roll_steps(), 8);
    }

    #[test]
    fn test_roll_steps_never_zero() {
        let timing = Timing {
            roll_duration: Duration::ZERO,
            roll_interval: Duration::from_millis(40),
            highlight: Duration::ZERO,
        };
        assert_eq!(timing.roll_steps(), 1);

        let timing = Timing {
            roll_duration: Duration::from_millis(100),
            roll_interval: Duration::ZERO,
            highlight: Duration::ZERO,
        };
        assert_eq!(timing.roll_steps(), 100);
    }
}
