// src/error.rs
// Error type for the program shell: terminal I/O, configuration and logging setup.
// Game operations themselves never fail; invalid ones are ignored.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error in {path}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, CallerError>;
