//! Window + OpenGL context management.
//!
//! This module is responsible for:
//! - choosing the monitor and creating the window
//! - negotiating a context version from the configured candidates
//! - presenting frames and resizing the surface

mod context;
mod gl;
mod negotiate;

pub use context::GlContext;
pub use gl::GlDevice;
pub use negotiate::{negotiate, select_monitor, ContextError, VersionAttempt};
