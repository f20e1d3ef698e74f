//! Terminal UI layer.
//!
//! The UI module owns rendering, keyboard handling, and loop control for the
//! text user interface.
//!
//! - [`app_loop`]: the interaction loop that turns terminal input into
//!   [`crate::core::app::AppAction`]s and runs the resulting background work.
//! - [`renderer`]: view composition and frame output.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns upload, prompt, and result semantics.

pub mod app_loop;
pub mod renderer;
