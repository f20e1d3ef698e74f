//! Main event loop and terminal lifecycle
//!
//! This module contains the loop that reads terminal input, renders the UI,
//! and runs encodes, generations, and downloads in the background.

mod event_loop;
mod keybindings;
mod lifecycle;

pub use event_loop::run_app;
