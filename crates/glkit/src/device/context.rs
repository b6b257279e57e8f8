use std::ffi::{c_void, CStr};
use std::fmt;
use std::ops::Deref;

/// `glProgramParameteri(program, pname, value)`.
type ProgramParameteri = unsafe extern "system" fn(u32, u32, i32);

/// The `glow` function table plus the entry points `glow::HasContext` does
/// not expose.
///
/// Derefs to `glow::Context`, so scenes call `HasContext` methods on it
/// directly.
pub struct GlContext {
    glow: glow::Context,
    program_parameteri: Option<ProgramParameteri>,
}

impl GlContext {
    /// Builds the function table from a `get_proc_address` style loader.
    ///
    /// # Safety
    /// A GL context must be current on this thread and `loader` must return
    /// entry points for that context (or null).
    pub unsafe fn from_loader<F>(mut loader: F) -> Self
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        let ptr = loader(c"glProgramParameteri");
        let program_parameteri = if ptr.is_null() {
            log::warn!("glProgramParameteri is unavailable; separable programs are disabled");
            None
        } else {
            // SAFETY: a non-null pointer returned for this name has the
            // `glProgramParameteri` signature.
            Some(unsafe { std::mem::transmute::<*const c_void, ProgramParameteri>(ptr) })
        };

        // SAFETY: forwarded from the caller.
        let glow = unsafe { glow::Context::from_loader_function_cstr(loader) };

        Self {
            glow,
            program_parameteri,
        }
    }

    /// Whether programs can be marked separable on this context.
    pub fn supports_separable_programs(&self) -> bool {
        self.program_parameteri.is_some()
    }

    /// Sets an integer program parameter such as `PROGRAM_SEPARABLE`.
    pub fn program_parameter_i32(
        &self,
        program: glow::Program,
        parameter: u32,
        value: i32,
    ) -> Result<(), String> {
        let f = self
            .program_parameteri
            .ok_or_else(|| "glProgramParameteri is not supported by this context".to_string())?;
        // SAFETY: the pointer was loaded for this context, which is current
        // on the GL thread, and `program` was created by it.
        unsafe { f(program.0.get(), parameter, value) };
        Ok(())
    }
}

impl Deref for GlContext {
    type Target = glow::Context;

    fn deref(&self) -> &glow::Context {
        &self.glow
    }
}

impl fmt::Debug for GlContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlContext")
            .field("separable_programs", &self.supports_separable_programs())
            .finish_non_exhaustive()
    }
}
