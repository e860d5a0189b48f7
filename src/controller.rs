// src/controller.rs
// The draw controller owns the session store and the transient animation state.
//
// A draw runs in two steps: `draw()` moves the controller to `Drawing`, then the
// caller's repeating timer feeds `roll_tick()` until the last tick commits the
// number. Every other operation is ignored while a draw is rolling.

use std::time::Instant;

use tracing::{debug, info};

use crate::defs::{Number, TOTALNUMBERS, Timing};
use crate::rng::RandomSource;
use crate::session::Session;
use crate::share::{ClipboardTarget, ShareOutcome, SharePayload, ShareTarget, share_or_copy};

/// Yes/no confirmation capability used by reset.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// A confirmation that was already collected from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer(pub bool);

impl Confirm for Answer {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

pub const RESET_PROMPT: &str = "Reset the game? All called numbers will be cleared.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roll {
    pub ticks_done: u32,
    pub decoy: Option<Number>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Drawing(Roll),
}

/// Result of one roll timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A new decoy is on display; keep the timer running.
    Rolling(Number),
    /// The draw committed this number; stop the timer.
    Committed(Number),
    /// Nothing was rolling; stop the timer.
    Idle,
}

pub struct DrawController<R: RandomSource> {
    session: Session,
    phase: Phase,
    rng: R,
    timing: Timing,
    highlight_until: Option<Instant>,
}

impl<R: RandomSource> DrawController<R> {
    pub fn new(rng: R, timing: Timing) -> Self {
        DrawController {
            session: Session::new(),
            phase: Phase::Idle,
            rng,
            timing,
            highlight_until: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, Phase::Drawing(_))
    }

    /// The decoy on display while rolling.
    pub fn decoy(&self) -> Option<Number> {
        match self.phase {
            Phase::Drawing(roll) => roll.decoy,
            Phase::Idle => None,
        }
    }

    pub fn can_draw(&self) -> bool {
        !self.is_drawing() && !self.session.is_exhausted()
    }

    pub fn can_undo(&self) -> bool {
        !self.is_drawing() && self.session.has_started()
    }

    pub fn can_reset(&self) -> bool {
        !self.is_drawing()
    }

    pub fn is_highlighted(&self, now: Instant) -> bool {
        self.highlight_until.is_some_and(|until| now < until)
    }

    pub fn highlight_deadline(&self) -> Option<Instant> {
        self.highlight_until
    }

    /// Clears the post-draw highlight once its deadline has passed.
    pub fn expire_highlight(&mut self, now: Instant) -> bool {
        match self.highlight_until {
            Some(until) if now >= until => {
                self.highlight_until = None;
                true
            }
            _ => false,
        }
    }

    /// Starts a rolling draw. Returns false, changing nothing, when the pouch is
    /// empty or a draw is already rolling.
    pub fn draw(&mut self) -> bool {
        if !self.can_draw() {
            debug!(
                drawing = self.is_drawing(),
                remaining = self.session.remaining_count(),
                "Draw ignored"
            );
            return false;
        }
        self.phase = Phase::Drawing(Roll { ticks_done: 0, decoy: None });
        self.highlight_until = None;
        debug!(steps = self.timing.roll_steps(), "Draw started");
        true
    }

    /// Advances the rolling animation by one timer tick.
    pub fn roll_tick(&mut self, now: Instant) -> Tick {
        let Phase::Drawing(mut roll) = self.phase else {
            return Tick::Idle;
        };

        let decoy = self.rng.decoy();
        roll.ticks_done += 1;
        roll.decoy = Some(decoy);

        if roll.ticks_done < self.timing.roll_steps() {
            self.phase = Phase::Drawing(roll);
            return Tick::Rolling(decoy);
        }

        self.phase = Phase::Idle;
        match self.session.draw_with(&mut self.rng) {
            Some(number) => {
                self.highlight_until = Some(now + self.timing.highlight);
                info!(number, drawn = self.session.drawn_count(), "Number called");
                Tick::Committed(number)
            }
            // draw() already refused an empty pouch
            None => Tick::Idle,
        }
    }

    /// Takes back the last call. Returns the number put back in the pouch.
    pub fn undo(&mut self) -> Option<Number> {
        if !self.can_undo() {
            debug!(drawing = self.is_drawing(), "Undo ignored");
            return None;
        }
        let number = self.session.undo()?;
        self.highlight_until = None;
        info!(number, current = ?self.session.current(), "Undid call of {number}");
        Some(number)
    }

    /// Starts a new game after the user confirms. Returns true if the session was reset.
    pub fn reset(&mut self, confirm: &mut impl Confirm) -> bool {
        if !self.can_reset() {
            debug!("Reset ignored while drawing");
            return false;
        }
        if !confirm.confirm(RESET_PROMPT) {
            debug!("Reset cancelled");
            return false;
        }
        info!(previous = %self.session.session_info(), "Game reset");
        self.session.reset();
        self.phase = Phase::Idle;
        self.highlight_until = None;
        true
    }

    /// Shares the game. Failures are logged by the share module and reported as `Failed`.
    pub fn share<P>(
        &mut self,
        platform: &mut P,
        title: &str,
        url: Option<&str>,
    ) -> Option<ShareOutcome>
    where
        P: ShareTarget + ClipboardTarget,
    {
        if self.is_drawing() {
            debug!("Share ignored while drawing");
            return None;
        }
        let payload = self.share_payload(title, url);
        Some(share_or_copy(platform, &payload))
    }

    pub fn share_payload(&self, title: &str, url: Option<&str>) -> SharePayload {
        let called = self.session.drawn_count();
        let text = match self.session.current() {
            Some(current) => {
                format!("{title}: {called} of {TOTALNUMBERS} numbers called, last call {current}")
            }
            None => format!("{title}: no numbers called yet"),
        };
        SharePayload {
            title: title.to_string(),
            text,
            url: url.filter(|u| !u.is_empty()).map(str::to_string),
        }
    }

    /// Teardown: drops an in-flight roll without committing it.
    pub fn shutdown(&mut self) {
        if self.is_drawing() {
            debug!("Pending draw cancelled on shutdown");
        }
        self.phase = Phase::Idle;
        self.highlight_until = None;
    }
}
