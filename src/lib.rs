// lib.rs
// Library modules for the bingo caller

pub mod defs;
pub mod rng;
pub mod pouch;
pub mod board;
pub mod session;
pub mod rhymes;
pub mod share;
pub mod controller;
pub mod view;
pub mod terminal;
pub mod config;
pub mod logging;
pub mod error;
pub mod app;
