//! Snekboard - a terminal snake game with per-player score history
//!
//! - Arena simulation (grid, food, sim modules)
//! - Score and colour records (store module)
//! - Screen flow around a session (session module)
//! - Terminal rendering and key translation (ui, input modules)

pub mod config;
pub mod food;
pub mod grid;
pub mod input;
pub mod palette;
pub mod session;
pub mod sim;
pub mod store;
pub mod ui;
