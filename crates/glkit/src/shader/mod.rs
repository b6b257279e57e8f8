//! Shader compilation and program linking.
//!
//! The loader talks to the driver through [`ShaderApi`], which is implemented
//! for [`GlContext`](crate::device::GlContext). Native shader and program handles are owned by
//! [`ShaderStage`] and [`Program`] and are released when those are dropped.

mod api;
mod error;
mod info;
mod load;

#[cfg(test)]
pub(crate) mod mock;

pub use api::ShaderApi;
pub use error::{error_message, CompileError, InfoLogSource, LoadError};
pub use info::{ShaderInfo, ShaderKind, ShaderStage};
pub use load::{load, load_separable, Program};
