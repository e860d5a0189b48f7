// src/view.rs
// Pure presentation: turns the controller state into styled lines.
// Nothing here touches the terminal; `terminal` paints the resulting `Screen`.

use std::time::Instant;

use crate::controller::DrawController;
use crate::defs::{BOARDCONFIG, FIRSTNUMBER, LASTNUMBER, NUMBERSPERROW, Number, TOTALNUMBERS};
use crate::rhymes::rhyme_for;
use crate::rng::RandomSource;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Title,
    Label,
    Muted,
    Call,
    CallHighlight,
    CallRolling,
    Rhyme,
    Key,
    Disabled,
    Drawn,
    Undrawn,
    Current,
    ProgressFill,
    ProgressEmpty,
    Notice,
    Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Span { text: text.into(), tone }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line(pub Vec<Span>);

impl Line {
    pub fn text(&self) -> String {
        self.0.iter().map(|span| span.text.as_str()).collect()
    }

    fn push(&mut self, text: impl Into<String>, tone: Tone) {
        self.0.push(Span::new(text, tone));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub lines: Vec<Line>,
}

impl Screen {
    pub fn text(&self) -> String {
        self.lines.iter().map(Line::text).collect::<Vec<_>>().join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Undrawn,
    Drawn,
    Current,
}

/// What the big call display shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDisplay {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
    pub rhyme: Option<&'static str>,
}

/// Everything outside the controller that the screen shows.
#[derive(Debug, Clone, Default)]
pub struct Overlay<'a> {
    pub title: &'a str,
    pub history_len: usize,
    pub notice: Option<&'a str>,
    pub prompt: Option<&'a str>,
    pub width: u16,
}

pub fn call_display<R: RandomSource>(controller: &DrawController<R>, now: Instant) -> CallDisplay {
    if controller.is_drawing() {
        return CallDisplay {
            label: "PICKING...",
            value: controller.decoy().map_or_else(|| "··".to_string(), |n| n.to_string()),
            tone: Tone::CallRolling,
            rhyme: None,
        };
    }

    let highlighted = controller.is_highlighted(now);
    let current = controller.session().current();
    CallDisplay {
        label: "CURRENT CALL",
        value: current.map_or_else(|| "—".to_string(), |n| n.to_string()),
        tone: if highlighted { Tone::CallHighlight } else { Tone::Call },
        rhyme: current.filter(|_| !highlighted).and_then(rhyme_for),
    }
}

pub fn cell_state(session: &Session, number: Number, rolling: bool) -> CellState {
    if !rolling && session.current() == Some(number) {
        CellState::Current
    } else if session.is_drawn(number) {
        CellState::Drawn
    } else {
        CellState::Undrawn
    }
}

/// The master board: rows of ten numbers grouped into 3x5 cards.
pub fn board_lines(session: &Session, rolling: bool) -> Vec<Line> {
    let rows = TOTALNUMBERS / NUMBERSPERROW as usize;
    let mut lines = Vec::new();

    for row in 0..rows {
        if row > 0 {
            let gap = if row % BOARDCONFIG.rows_per_card as usize == 0 {
                BOARDCONFIG.vnumbers_space + BOARDCONFIG.vcards_space
            } else {
                BOARDCONFIG.vnumbers_space
            };
            for _ in 0..gap {
                lines.push(Line::default());
            }
        }

        let mut line = Line::default();
        for col in 0..NUMBERSPERROW as usize {
            if col > 0 {
                let mut space = BOARDCONFIG.hnumbers_space as usize;
                if col % BOARDCONFIG.cols_per_card as usize == 0 {
                    space += BOARDCONFIG.hcards_space as usize;
                }
                line.push(" ".repeat(space), Tone::Plain);
            }
            let number = FIRSTNUMBER + (row * NUMBERSPERROW as usize + col) as Number;
            let tone = match cell_state(session, number, rolling) {
                CellState::Current => Tone::Current,
                CellState::Drawn => Tone::Drawn,
                CellState::Undrawn => Tone::Undrawn,
            };
            line.push(format!("{number:2}"), tone);
        }
        lines.push(line);
    }

    lines
}

/// A bar of `width` cells filled in proportion to `percent`.
pub fn progress_bar(percent: f64, width: usize) -> Line {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let mut line = Line::default();
    line.push("█".repeat(filled), Tone::ProgressFill);
    line.push("░".repeat(width - filled), Tone::ProgressEmpty);
    line
}

pub fn history_line(session: &Session, history_len: usize) -> Line {
    let mut line = Line::default();
    line.push("HISTORY  ", Tone::Label);
    if session.drawn_count() < 2 {
        line.push("...", Tone::Muted);
        return line;
    }
    let history = session.history(history_len);
    for (i, number) in history.iter().enumerate() {
        if i > 0 {
            line.push(" ", Tone::Plain);
        }
        line.push(format!("{number:2}"), Tone::Muted);
    }
    line
}

fn key_hint(line: &mut Line, key: &str, label: &str, enabled: bool) {
    let (key_tone, label_tone) = if enabled {
        (Tone::Key, Tone::Plain)
    } else {
        (Tone::Disabled, Tone::Disabled)
    };
    line.push(format!("[{key}]"), key_tone);
    line.push(format!(" {label}   "), label_tone);
}

pub fn controls_line<R: RandomSource>(controller: &DrawController<R>) -> Line {
    let mut line = Line::default();
    let drawing = controller.is_drawing();
    key_hint(&mut line, "Space", if drawing { "..." } else { "DRAW" }, controller.can_draw());
    key_hint(&mut line, "U", "UNDO", controller.can_undo());
    key_hint(&mut line, "R", "RESET", controller.can_reset());
    key_hint(&mut line, "S", "SHARE", !drawing);
    key_hint(&mut line, "Q", "QUIT", true);
    line
}

/// Lays out the whole screen.
pub fn render<R: RandomSource>(
    controller: &DrawController<R>,
    overlay: &Overlay<'_>,
    now: Instant,
) -> Screen {
    let session = controller.session();
    let width = overlay.width.max(40) as usize;
    let mut lines = Vec::new();

    // Header
    let counter = format!("Drawn {} / {TOTALNUMBERS}", session.drawn_count());
    let mut header = Line::default();
    header.push(overlay.title, Tone::Title);
    let pad = width.saturating_sub(overlay.title.chars().count() + counter.chars().count()).max(2);
    header.push(" ".repeat(pad), Tone::Plain);
    header.push(counter, Tone::Label);
    lines.push(header);
    lines.push(Line::default());

    // Call display
    let call = call_display(controller, now);
    lines.push(Line(vec![Span::new(call.label, Tone::Label)]));
    lines.push(Line(vec![Span::new(format!("  ( {:>2} )", call.value), call.tone)]));
    let rhyme = call.rhyme.map(|r| format!("\"{r}\"")).unwrap_or_default();
    lines.push(Line(vec![Span::new(rhyme, Tone::Rhyme)]));
    lines.push(Line::default());

    lines.push(controls_line(controller));
    lines.push(Line::default());
    lines.push(history_line(session, overlay.history_len));
    lines.push(Line::default());

    // Master board
    let mut board_header = Line::default();
    board_header.push("MASTER BOARD", Tone::Label);
    board_header.push(format!("  {FIRSTNUMBER}–{LASTNUMBER}"), Tone::Muted);
    lines.push(board_header);
    lines.extend(board_lines(session, controller.is_drawing()));
    lines.push(Line::default());
    lines.push(progress_bar(session.progress(), width.min(60)));
    lines.push(Line::default());

    if let Some(prompt) = overlay.prompt {
        lines.push(Line(vec![Span::new(format!("{prompt} (y/n)"), Tone::Prompt)]));
    } else if let Some(notice) = overlay.notice {
        lines.push(Line(vec![Span::new(notice, Tone::Notice)]));
    } else {
        lines.push(Line::default());
    }
    lines.push(Line(vec![Span::new(overlay.title, Tone::Muted)]));

    Screen { lines }
}
