//! Keyboard input.
//!
//! Public types are platform-agnostic; `platform::winit` translates window
//! system key events into [`KeyInput`].

pub mod platform;
mod types;

pub use types::{Key, KeyInput, KeyState, Modifiers};
