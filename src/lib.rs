//! Study notes and focus timer library
//!
//! This library provides a persistent collection of short study notes with
//! done/pending tracking and substring search, plus a countdown timer for
//! focused work sessions.

mod cli;
mod config;
mod errors;
mod focus_ticker;
mod helper;
mod kv_store;
mod note;
mod stats;
mod storage;
mod timer;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use focus_ticker::*;
pub use helper::*;
pub use kv_store::*;
pub use note::*;
pub use stats::*;
pub use storage::*;
pub use timer::*;
pub use types::*;
