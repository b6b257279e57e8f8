use std::io;
use std::path::PathBuf;

use super::api::ShaderApi;
use super::info::ShaderKind;

/// A shader stage that the driver refused to compile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to compile {kind} shader {file}: {log}")]
pub struct CompileError {
    pub kind: ShaderKind,
    /// Source file name as given in the `ShaderInfo`.
    pub file: String,
    /// Driver info-log text.
    pub log: String,
}

/// Errors returned by [`load`](super::load) and [`load_separable`](super::load_separable).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read shader source {path}")]
    Source {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create {object} object: {message}")]
    Create {
        object: &'static str,
        message: String,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("failed to mark program separable: {message}")]
    Separable { message: String },

    #[error("failed to link program: {log}")]
    Link { log: String },
}

impl LoadError {
    /// Driver diagnostic text, if the failure came from the driver.
    pub fn log(&self) -> Option<&str> {
        match self {
            LoadError::Compile(e) => Some(&e.log),
            LoadError::Link { log } => Some(log),
            LoadError::Source { .. } | LoadError::Create { .. } | LoadError::Separable { .. } => None,
        }
    }
}

/// Object whose info-log is requested.
#[derive(Debug, Copy, Clone)]
pub enum InfoLogSource<S, P> {
    Shader(S),
    Program(P),
}

/// Returns the driver's info-log for a shader or program object.
///
/// Trailing NUL padding and whitespace are stripped; the rest is returned
/// verbatim.
pub fn error_message<G: ShaderApi>(
    gl: &G,
    source: InfoLogSource<G::Shader, G::Program>,
) -> String {
    let raw = match source {
        InfoLogSource::Shader(shader) => gl.shader_info_log(shader),
        InfoLogSource::Program(program) => gl.program_info_log(program),
    };

    raw.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::mock::MockGl;

    #[test]
    fn shader_log_names_the_failing_token() {
        let gl = MockGl::new();
        let shader = gl.create_shader(ShaderKind::Fragment).unwrap();
        gl.shader_source(shader, "void main() {\n#error stray_identifier\n}\n");
        gl.compile_shader(shader);
        assert!(!gl.shader_compile_status(shader));

        let msg = error_message(&gl, InfoLogSource::Shader(shader));
        assert!(!msg.is_empty());
        assert!(msg.contains("stray_identifier"), "{msg}");
        assert!(msg.contains("0:2"), "{msg}");
    }

    #[test]
    fn program_log_is_trimmed() {
        let gl = MockGl::new();
        let program = gl.create_program().unwrap();
        gl.link_program(program);

        let msg = error_message(&gl, InfoLogSource::Program(program));
        assert!(!msg.is_empty());
        assert!(!msg.ends_with('\0'));
        assert!(!msg.ends_with('\n'));
    }

    #[test]
    fn compile_error_display_names_file_and_stage() {
        let err = LoadError::from(CompileError {
            kind: ShaderKind::Fragment,
            file: "broken.frag".to_string(),
            log: "0:3: syntax error".to_string(),
        });

        assert_eq!(
            err.to_string(),
            "failed to compile fragment shader broken.frag: 0:3: syntax error"
        );
        assert_eq!(err.log(), Some("0:3: syntax error"));
    }
}
