//! ImageWand is a terminal front end for prompting an image generation
//! service and iterating on its results.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the upload state machine, the prompt field, the result
//!   viewer, conversation history, and configuration.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and background work.
//! - [`api`] defines the generation payloads and the HTTP client that sends them.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which initializes logging and configuration
//! and dispatches into [`ui::app_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
