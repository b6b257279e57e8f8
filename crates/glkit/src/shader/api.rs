use std::fmt::Debug;

use glow::HasContext;

use crate::device::GlContext;

use super::info::ShaderKind;

/// The slice of the GL API used to build shader programs.
///
/// All methods must be called on the thread that owns the current GL context.
pub trait ShaderApi {
    type Shader: Copy + Debug;
    type Program: Copy + Debug;

    fn create_shader(&self, kind: ShaderKind) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// Marks the program separable before linking. Fails when the context
    /// cannot set program parameters.
    fn set_program_separable(&self, program: Self::Program, separable: bool) -> Result<(), String>;
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
}

// SAFETY (all blocks below): the runtime only hands out the context on the
// thread it was made current on, and every handle passed in was created by
// this same context.
impl ShaderApi for GlContext {
    type Shader = glow::Shader;
    type Program = glow::Program;

    fn create_shader(&self, kind: ShaderKind) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(&**self, kind.gl_enum()) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(&**self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(&**self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(&**self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(&**self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(&**self, program, shader) }
    }

    fn set_program_separable(&self, program: Self::Program, separable: bool) -> Result<(), String> {
        self.program_parameter_i32(program, glow::PROGRAM_SEPARABLE, separable as i32)
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(&**self, program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(&**self, program) }
    }
}
