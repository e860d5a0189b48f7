// src/app.rs
// The caller application: routes key actions to the draw controller and runs the
// event loop. The loop owns the single roll timer; a new draw always replaces it.

use std::future::pending;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::Event;
use futures::{Stream, StreamExt};
use tokio::time::{Interval, MissedTickBehavior, interval_at, sleep_until};
use tracing::{debug, info};

use crate::config::CallerConfig;
use crate::controller::{Answer, DrawController, RESET_PROMPT, Tick};
use crate::defs::NOTICE_DURATION;
use crate::error::Result;
use crate::rng::RandomSource;
use crate::share::{ClipboardTarget, ShareOutcome, ShareTarget};
use crate::terminal::{self, KeyAction};
use crate::view::{self, Overlay, Screen};

/// What the event loop must do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    StartRoll,
    StopRoll,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Notice {
    text: String,
    until: Instant,
}

pub struct App<R: RandomSource, P: ShareTarget + ClipboardTarget> {
    controller: DrawController<R>,
    platform: P,
    config: CallerConfig,
    confirming_reset: bool,
    notice: Option<Notice>,
}

impl<R: RandomSource, P: ShareTarget + ClipboardTarget> App<R, P> {
    pub fn new(rng: R, platform: P, config: CallerConfig) -> Self {
        App {
            controller: DrawController::new(rng, config.timing),
            platform,
            config,
            confirming_reset: false,
            notice: None,
        }
    }

    pub fn controller(&self) -> &DrawController<R> {
        &self.controller
    }

    pub fn is_confirming_reset(&self) -> bool {
        self.confirming_reset
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.text.as_str())
    }

    pub fn handle_action(&mut self, action: KeyAction, now: Instant) -> Effect {
        match action {
            KeyAction::Draw => {
                if self.controller.draw() {
                    Effect::StartRoll
                } else {
                    Effect::None
                }
            }
            KeyAction::Undo => {
                self.controller.undo();
                Effect::None
            }
            KeyAction::Reset => {
                if self.controller.can_reset() {
                    self.confirming_reset = true;
                }
                Effect::None
            }
            KeyAction::Answer(yes) => {
                if self.confirming_reset {
                    self.confirming_reset = false;
                    if self.controller.reset(&mut Answer(yes)) {
                        self.notice = None;
                        return Effect::StopRoll;
                    }
                }
                Effect::None
            }
            KeyAction::Share => {
                let url = self.config.share_url.as_deref();
                let outcome = self.controller.share(&mut self.platform, &self.config.title, url);
                let text = match outcome {
                    Some(ShareOutcome::Copied) => Some("Link copied to clipboard!"),
                    Some(ShareOutcome::Failed) => Some("Could not share the game."),
                    Some(ShareOutcome::Shared) | None => None,
                };
                if let Some(text) = text {
                    self.notice = Some(Notice {
                        text: text.to_string(),
                        until: now + NOTICE_DURATION,
                    });
                }
                Effect::None
            }
            KeyAction::Quit => Effect::Quit,
            KeyAction::Redraw => Effect::None,
        }
    }

    /// Feeds one roll timer tick to the controller.
    pub fn handle_roll_tick(&mut self, now: Instant) -> Effect {
        match self.controller.roll_tick(now) {
            Tick::Rolling(_) => Effect::None,
            Tick::Committed(_) | Tick::Idle => Effect::StopRoll,
        }
    }

    /// The next moment something on screen changes without input.
    pub fn next_deadline(&self) -> Option<Instant> {
        let highlight = self.controller.highlight_deadline();
        let notice = self.notice.as_ref().map(|n| n.until);
        match (highlight, notice) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn expire(&mut self, now: Instant) {
        self.controller.expire_highlight(now);
        if self.notice.as_ref().is_some_and(|n| now >= n.until) {
            self.notice = None;
        }
    }

    pub fn screen(&self, now: Instant, width: u16) -> Screen {
        let overlay = Overlay {
            title: &self.config.title,
            history_len: self.config.history_len,
            notice: self.notice(),
            prompt: self.confirming_reset.then_some(RESET_PROMPT),
            width,
        };
        view::render(&self.controller, &overlay, now)
    }

    pub fn shutdown(&mut self) {
        self.controller.shutdown();
        info!(summary = %self.controller.session().session_info(), "Caller closed");
    }
}

fn roll_timer(period: Duration) -> Interval {
    // First decoy one period after the key press, like a repeating UI timer
    let period = period.max(Duration::from_millis(1));
    let mut timer = interval_at(tokio::time::Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

async fn next_roll_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => pending().await,
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => pending().await,
    }
}

// Read through tokio's clock so a paused test runtime drives every deadline
fn clock() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Runs the caller over a stream of terminal events until the user quits or the
/// stream ends.
pub async fn run<R, P, S>(app: &mut App<R, P>, events: &mut S, out: &mut impl Write) -> Result<()>
where
    R: RandomSource,
    P: ShareTarget + ClipboardTarget,
    S: Stream<Item = io::Result<Event>> + Unpin,
{
    let mut roll: Option<Interval> = None;

    terminal::draw_screen(out, &app.screen(clock(), terminal::terminal_width()))?;

    loop {
        let deadline = app.next_deadline();
        let effect = tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => {
                    match terminal::key_action(&event, app.is_confirming_reset()) {
                        Some(action) => {
                            debug!(?action, "Key action");
                            app.handle_action(action, clock())
                        }
                        None => continue,
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => Effect::Quit,
            },
            _ = next_roll_tick(&mut roll) => app.handle_roll_tick(clock()),
            _ = wait_for(deadline) => {
                app.expire(clock());
                Effect::None
            }
        };

        match effect {
            Effect::StartRoll => roll = Some(roll_timer(app.controller().timing().roll_interval)),
            Effect::StopRoll => roll = None,
            Effect::Quit => break,
            Effect::None => {}
        }

        terminal::draw_screen(out, &app.screen(clock(), terminal::terminal_width()))?;
    }

    // Teardown drops any pending roll timer
    drop(roll);
    app.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Phase;
    use crate::rng::SeededRandom;
    use crate::session::Session;
    use crate::share::tests::FakePlatform;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use futures::channel::mpsc;

    fn app() -> App<SeededRandom, FakePlatform> {
        App::new(SeededRandom::new(9), FakePlatform::default(), CallerConfig::default())
    }

    fn roll_to_commit(app: &mut App<SeededRandom, FakePlatform>, now: Instant) {
        assert_eq!(app.handle_action(KeyAction::Draw, now), Effect::StartRoll);
        while app.handle_roll_tick(now) == Effect::None {}
        assert_eq!(app.controller().phase(), Phase::Idle);
    }

    #[test]
    fn test_draw_starts_and_stops_roll() {
        let mut app = app();
        let now = Instant::now();
        roll_to_commit(&mut app, now);
        assert_eq!(app.controller().session().drawn_count(), 1);
    }

    #[test]
    fn test_second_draw_while_rolling_keeps_timer() {
        let mut app = app();
        let now = Instant::now();
        assert_eq!(app.handle_action(KeyAction::Draw, now), Effect::StartRoll);
        assert_eq!(app.handle_action(KeyAction::Draw, now), Effect::None);
    }

    #[test]
    fn test_reset_needs_confirmation() {
        let mut app = app();
        let now = Instant::now();
        roll_to_commit(&mut app, now);

        app.handle_action(KeyAction::Reset, now);
        assert!(app.is_confirming_reset());
        assert!(app.screen(now, 80).text().contains("(y/n)"));

        app.handle_action(KeyAction::Answer(false), now);
        assert!(!app.is_confirming_reset());
        assert_eq!(app.controller().session().drawn_count(), 1);

        app.handle_action(KeyAction::Reset, now);
        assert_eq!(app.handle_action(KeyAction::Answer(true), now), Effect::StopRoll);
        assert_eq!(app.controller().session(), &Session::new());
    }

    #[test]
    fn test_reset_ignored_while_rolling() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(KeyAction::Draw, now);
        app.handle_action(KeyAction::Reset, now);
        assert!(!app.is_confirming_reset());
    }

    #[test]
    fn test_stray_answer_does_nothing() {
        let mut app = app();
        let now = Instant::now();
        roll_to_commit(&mut app, now);
        assert_eq!(app.handle_action(KeyAction::Answer(true), now), Effect::None);
        assert_eq!(app.controller().session().drawn_count(), 1);
    }

    #[test]
    fn test_share_shows_notice_until_deadline() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(KeyAction::Share, now);
        assert_eq!(app.notice(), Some("Link copied to clipboard!"));
        assert_eq!(app.next_deadline(), Some(now + NOTICE_DURATION));

        app.expire(now + NOTICE_DURATION - Duration::from_millis(1));
        assert!(app.notice().is_some());
        app.expire(now + NOTICE_DURATION);
        assert_eq!(app.notice(), None);
        assert_eq!(app.next_deadline(), None);
    }

    #[test]
    fn test_next_deadline_prefers_highlight() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(KeyAction::Share, now);
        roll_to_commit(&mut app, now);
        assert_eq!(app.next_deadline(), Some(now + app.controller().timing().highlight));
    }

    #[test]
    fn test_quit_and_shutdown() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(KeyAction::Draw, now);
        assert_eq!(app.handle_action(KeyAction::Quit, now), Effect::Quit);
        app.shutdown();
        assert_eq!(app.controller().phase(), Phase::Idle);
        assert_eq!(app.controller().session().drawn_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_roll_timer_ticks_at_interval() {
        let period = Duration::from_millis(40);
        let start = tokio::time::Instant::now();
        let mut timer = Some(roll_timer(period));
        next_roll_tick(&mut timer).await;
        assert!(start.elapsed() >= period);
        next_roll_tick(&mut timer).await;
        assert!(start.elapsed() >= period * 2);
    }

    fn press(c: char) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
    }

    /// Presses space, waits `wait` on the paused clock, then presses `q`.
    async fn run_draw_then_quit(wait: Duration) -> App<SeededRandom, FakePlatform> {
        let mut app = app();
        let (tx, mut events) = mpsc::unbounded();
        let mut out = Vec::new();
        tx.unbounded_send(press(' ')).unwrap();

        let keys = async {
            tokio::time::sleep(wait).await;
            tx.unbounded_send(press('q')).unwrap();
        };
        let (result, ()) = tokio::join!(run(&mut app, &mut events, &mut out), keys);
        result.unwrap();
        assert!(String::from_utf8_lossy(&out).contains("Drawn"));
        app
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_mid_roll_commits_nothing() {
        let interval = CallerConfig::default().timing.roll_interval;
        let app = run_draw_then_quit(interval * 3 + Duration::from_millis(10)).await;
        assert_eq!(app.controller().phase(), Phase::Idle);
        assert_eq!(app.controller().session().drawn_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_roll_commits_once() {
        let timing = CallerConfig::default().timing;
        let full_roll = timing.roll_interval * timing.roll_steps();
        let app = run_draw_then_quit(full_roll + Duration::from_millis(10)).await;
        assert_eq!(app.controller().phase(), Phase::Idle);
        assert_eq!(app.controller().session().drawn_count(), 1);
        assert!(app.controller().session().check_invariants().is_ok());
    }
}
