//! Contracts between the runtime and user code.
//!
//! A demo implements [`Scene`]; the runtime drives it through its lifecycle
//! and hands it a [`SceneCtx`] during setup.

mod ctx;
mod scene;

pub use ctx::SceneCtx;
pub use scene::{AppControl, Scene};
