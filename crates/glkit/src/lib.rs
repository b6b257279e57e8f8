//! glkit: a small scaffold for OpenGL demos.
//!
//! - [`shader`] compiles and links shader programs without leaking driver objects
//! - [`window`] opens a window, negotiates a GL context and runs a [`core::Scene`]
//! - [`path`] points the working directory at a demo's assets

pub mod config;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod path;
pub mod shader;
pub mod time;
pub mod window;
