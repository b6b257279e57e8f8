use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::api::ShaderApi;
use super::error::{error_message, CompileError, InfoLogSource, LoadError};

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
    Geometry,
    TessControl,
    TessEvaluation,
    Compute,
}

impl ShaderKind {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderKind::Vertex => glow::VERTEX_SHADER,
            ShaderKind::Fragment => glow::FRAGMENT_SHADER,
            ShaderKind::Geometry => glow::GEOMETRY_SHADER,
            ShaderKind::TessControl => glow::TESS_CONTROL_SHADER,
            ShaderKind::TessEvaluation => glow::TESS_EVALUATION_SHADER,
            ShaderKind::Compute => glow::COMPUTE_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderKind::Vertex => "vertex",
            ShaderKind::Fragment => "fragment",
            ShaderKind::Geometry => "geometry",
            ShaderKind::TessControl => "tessellation control",
            ShaderKind::TessEvaluation => "tessellation evaluation",
            ShaderKind::Compute => "compute",
        };
        f.write_str(name)
    }
}

/// One shader stage of a program: its kind and source file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShaderInfo {
    pub kind: ShaderKind,
    pub path: PathBuf,
}

impl ShaderInfo {
    pub fn new(kind: ShaderKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn vertex(path: impl Into<PathBuf>) -> Self {
        Self::new(ShaderKind::Vertex, path)
    }

    pub fn fragment(path: impl Into<PathBuf>) -> Self {
        Self::new(ShaderKind::Fragment, path)
    }

    /// File name used in diagnostics.
    pub fn file_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// A `ShaderInfo` bound to a GL context, owning at most one native shader.
///
/// The native shader is released by [`delete`](Self::delete) or on drop,
/// whichever comes first.
pub struct ShaderStage<'a, G: ShaderApi> {
    gl: &'a G,
    info: &'a ShaderInfo,
    handle: Option<G::Shader>,
}

impl<'a, G: ShaderApi> ShaderStage<'a, G> {
    pub fn new(gl: &'a G, info: &'a ShaderInfo) -> Self {
        Self {
            gl,
            info,
            handle: None,
        }
    }

    pub fn info(&self) -> &ShaderInfo {
        self.info
    }

    /// Native shader, if one is currently allocated.
    pub fn handle(&self) -> Option<G::Shader> {
        self.handle
    }

    /// Compiles the stage and attaches it to `program`.
    ///
    /// On a compile failure the native shader stays allocated and owned by
    /// this stage.
    pub fn compile(&mut self, program: G::Program) -> Result<(), LoadError> {
        let source = read_source(&self.info.path)?;

        let shader = self
            .gl
            .create_shader(self.info.kind)
            .map_err(|message| LoadError::Create {
                object: "shader",
                message,
            })?;
        self.handle = Some(shader);

        self.gl.shader_source(shader, &source);
        self.gl.compile_shader(shader);

        if !self.gl.shader_compile_status(shader) {
            return Err(CompileError {
                kind: self.info.kind,
                file: self.info.file_name(),
                log: error_message(self.gl, InfoLogSource::Shader(shader)),
            }
            .into());
        }

        self.gl.attach_shader(program, shader);
        Ok(())
    }

    /// Releases the native shader. Does nothing if none is allocated.
    pub fn delete(&mut self) {
        if let Some(shader) = self.handle.take() {
            self.gl.delete_shader(shader);
        }
    }
}

impl<G: ShaderApi> Drop for ShaderStage<'_, G> {
    fn drop(&mut self) {
        self.delete();
    }
}

fn read_source(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Source {
        path: path.to_path_buf(),
        source,
    })
}
