// src/bingo_caller.rs
//
// Full-screen terminal bingo caller for community events.
//
// Interactive Controls:
// - SPACE / ENTER: Draw the next number (rolls briefly before the call is committed)
// - U / BACKSPACE: Undo the last call
// - R: Reset the game (asks for confirmation)
// - S: Share the game link (copied to the clipboard)
// - Q / ESC: Exit
//
// CLI Options:
// - --config: Configuration file (default conf/caller.conf)
// - --title: Title shown in the header
// - --seed: Seed the draws for a reproducible game
// - --log-file / --log-level: Where and how much to log

use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::event::EventStream;
use tracing::{error, info};

use bingo_caller::app::{self, App};
use bingo_caller::config::CallerConfig;
use bingo_caller::error::Result;
use bingo_caller::logging;
use bingo_caller::rng::AnyRandom;
use bingo_caller::share::TerminalPlatform;
use bingo_caller::terminal::{self, TerminalGuard};

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(about = "Bingo Caller - Draw numbers 1-90 and show them on a master board")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Configuration file (defaults to conf/caller.conf when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Title shown in the header and footer
    #[arg(long)]
    title: Option<String>,

    /// Seed for the random draws, for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run_with_args(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_with_args(args: Args) -> Result<()> {
    let (mut config, report) = CallerConfig::load(args.config.as_deref())?;
    if let Some(title) = args.title {
        config.title = title;
    }
    if let Some(log_file) = args.log_file {
        config.log_file = log_file;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }

    logging::init_logging(&config.log_file, &config.log_level)?;
    report.log();
    config.log_summary();
    if let Some(seed) = args.seed {
        info!(seed, "Using seeded draws");
    }

    let mut app = App::new(AnyRandom::from_seed(args.seed), TerminalPlatform::new(), config);

    terminal::install_panic_hook();
    let guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();
    let mut events = EventStream::new();
    let result = app::run(&mut app, &mut events, &mut stdout).await;
    drop(guard);

    if let Err(e) = &result {
        error!(%e, "Caller stopped with an error");
    }
    result
}
