// src/share.rs
// Best-effort sharing of the game link: a platform share sheet when there is one,
// otherwise a copy to the clipboard. Failures are logged and never propagated.

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: Option<String>,
}

impl SharePayload {
    /// What goes on the clipboard when there is no share sheet.
    pub fn clipboard_text(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.text)
    }
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("sharing is not available on this platform")]
    Unavailable,
    #[error("clipboard error: {0}")]
    Clipboard(String),
    #[error("share failed: {0}")]
    Platform(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
    Failed,
}

/// Platform share sheet.
pub trait ShareTarget {
    fn is_available(&self) -> bool;
    fn share(&mut self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// Clipboard write access.
pub trait ClipboardTarget {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError>;
}

/// Shares through the platform when available, falling back to the clipboard.
pub fn share_or_copy<P>(platform: &mut P, payload: &SharePayload) -> ShareOutcome
where
    P: ShareTarget + ClipboardTarget,
{
    if platform.is_available() {
        return match platform.share(payload) {
            Ok(()) => {
                info!(title = %payload.title, "Shared game link");
                ShareOutcome::Shared
            }
            Err(err) => {
                warn!(%err, "Share failed");
                ShareOutcome::Failed
            }
        };
    }

    match platform.write_text(payload.clipboard_text()) {
        Ok(()) => {
            info!("Copied game link to clipboard");
            ShareOutcome::Copied
        }
        Err(err) => {
            warn!(%err, "Clipboard fallback failed");
            ShareOutcome::Failed
        }
    }
}

/// The terminal has no share sheet; the clipboard goes through arboard.
/// The clipboard handle is opened lazily and kept so X11 selections outlive the copy.
#[derive(Default)]
pub struct TerminalPlatform {
    clipboard: Option<arboard::Clipboard>,
}

impl TerminalPlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShareTarget for TerminalPlatform {
    fn is_available(&self) -> bool {
        false
    }

    fn share(&mut self, _payload: &SharePayload) -> Result<(), ShareError> {
        Err(ShareError::Unavailable)
    }
}

impl ClipboardTarget for TerminalPlatform {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError> {
        if self.clipboard.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ShareError::Clipboard(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }
        match self.clipboard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_string())
                .map_err(|e| ShareError::Clipboard(e.to_string())),
            None => Err(ShareError::Unavailable),
        }
    }
}
