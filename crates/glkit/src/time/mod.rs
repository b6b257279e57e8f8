//! Frame timing.
//!
//! The runtime owns one [`FrameClock`] and ticks it once per frame to obtain
//! the delta time passed to `Scene::update`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
