// src/terminal.rs
// Terminal input/output for the caller: raw mode and alternate screen handling,
// key mapping, and painting a rendered `Screen` with crossterm.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};

use crate::view::{Screen, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Draw,
    Undo,
    Reset,
    Share,
    Quit,
    Answer(bool),
    Redraw,
}

/// Maps a terminal event to an action. While a confirmation prompt is open every
/// key answers it: `y` confirms, anything else cancels. Ctrl-C always quits.
pub fn key_action(event: &Event, prompt_open: bool) -> Option<KeyAction> {
    match event {
        Event::Resize(_, _) => Some(KeyAction::Redraw),
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if is_ctrl_c(key) {
                Some(KeyAction::Quit)
            } else if prompt_open {
                Some(KeyAction::Answer(matches!(key.code, KeyCode::Char('y' | 'Y'))))
            } else {
                map_key(key)
            }
        }
        _ => None,
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c' | 'C'))
}

fn map_key(key: &KeyEvent) -> Option<KeyAction> {
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(KeyAction::Draw),
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('u' | 'U') => Some(KeyAction::Undo),
        KeyCode::Char('r' | 'R') => Some(KeyAction::Reset),
        KeyCode::Char('s' | 'S') => Some(KeyAction::Share),
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => Some(KeyAction::Quit),
        _ => None,
    }
}

fn tone_style(tone: Tone) -> (Option<Color>, Option<Attribute>) {
    match tone {
        Tone::Plain => (None, None),
        Tone::Title => (Some(Color::Magenta), Some(Attribute::Bold)),
        Tone::Label => (Some(Color::DarkGrey), Some(Attribute::Bold)),
        Tone::Muted => (Some(Color::DarkGrey), None),
        Tone::Call => (Some(Color::Blue), Some(Attribute::Bold)),
        Tone::CallHighlight => (Some(Color::Magenta), Some(Attribute::Bold)),
        Tone::CallRolling => (Some(Color::Grey), Some(Attribute::Dim)),
        Tone::Rhyme => (Some(Color::Magenta), Some(Attribute::Italic)),
        Tone::Key => (Some(Color::Cyan), Some(Attribute::Bold)),
        Tone::Disabled => (Some(Color::DarkGrey), Some(Attribute::Dim)),
        Tone::Drawn => (Some(Color::Blue), None),
        Tone::Undrawn => (Some(Color::DarkGrey), Some(Attribute::Dim)),
        Tone::Current => (Some(Color::Magenta), Some(Attribute::Reverse)),
        Tone::ProgressFill => (Some(Color::Magenta), None),
        Tone::ProgressEmpty => (Some(Color::DarkGrey), None),
        Tone::Notice => (Some(Color::Green), Some(Attribute::Bold)),
        Tone::Prompt => (Some(Color::Yellow), Some(Attribute::Bold)),
    }
}

/// Paints a full screen from the top-left corner.
pub fn draw_screen(out: &mut impl Write, screen: &Screen) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for (row, line) in screen.lines.iter().enumerate() {
        queue!(out, MoveTo(0, row as u16))?;
        for span in &line.0 {
            let (color, attribute) = tone_style(span.tone);
            if let Some(color) = color {
                queue!(out, SetForegroundColor(color))?;
            }
            if let Some(attribute) = attribute {
                queue!(out, SetAttribute(attribute))?;
            }
            queue!(out, Print(&span.text), SetAttribute(Attribute::Reset), ResetColor)?;
        }
    }
    out.flush()
}

pub fn terminal_width() -> u16 {
    terminal::size().map(|(cols, _)| cols).unwrap_or(80)
}

/// Raw mode and the alternate screen for as long as the guard lives.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

pub fn restore_terminal() {
    let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Restores the terminal before the default panic message is printed.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));
}
