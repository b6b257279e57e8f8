//! Window runtime and game loop.
//!
//! Owns the `winit` event loop and drives a [`Scene`](crate::core::Scene)
//! through setup, per-frame update/display, and cleanup.

mod runtime;

pub use runtime::{App, KeyCallback, RunState};
